use crate::error::ConfigError;
use crate::locale::Lang;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 测验服务器地址（不带结尾斜杠）
    pub server_base_url: String,
    /// 保存请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 测验草稿 TOML 文件存放目录
    pub draft_folder: String,
    /// 预览 HTML 输出目录，未设置时不输出
    pub preview_folder: Option<String>,
    /// 界面语言
    pub lang: Lang,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            draft_folder: "drafts".to_string(),
            preview_folder: None,
            lang: Lang::En,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，无法解析的值回退到默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            server_base_url: std::env::var("QUIZ_SERVER_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.server_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            preview_folder: std::env::var("PREVIEW_FOLDER").ok().or(default.preview_folder),
            lang: resolve_lang(
                std::env::var("QUIZ_LANG").ok().as_deref(),
                std::env::var("QUIZ_ACCEPT_LANGUAGE").ok().as_deref(),
            )
            .unwrap_or(default.lang),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 严格版本：遇到无法解析的环境变量时返回错误
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let config = Self::from_env();
        check_var::<u64>("REQUEST_TIMEOUT_SECS", "u64")?;
        check_var::<Lang>("QUIZ_LANG", "en|ru")?;
        check_var::<bool>("VERBOSE_LOGGING", "bool")?;
        Ok(config)
    }
}

/// `QUIZ_LANG` 优先，否则按 `Accept-Language` 格式的 `QUIZ_ACCEPT_LANGUAGE` 匹配
fn resolve_lang(lang: Option<&str>, accept_language: Option<&str>) -> Option<Lang> {
    lang.and_then(|v| v.parse().ok())
        .or_else(|| accept_language.map(Lang::best_match))
}

fn check_var<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Result<(), ConfigError> {
    match std::env::var(var_name) {
        Ok(value) if value.parse::<T>().is_err() => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
        _ => Ok(()),
    }
}
