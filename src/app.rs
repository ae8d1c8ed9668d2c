use crate::clients::QuizClient;
use crate::config::Config;
use crate::controller::FormController;
use crate::locale::Locale;
use crate::models::{load_all_drafts, QuizDraft, SaveOutcome};
use crate::utils::logging::{
    init_log_file, log_drafts_loaded, log_startup, print_final_stats, truncate_text,
};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<QuizClient>,
    locale: Locale,
}

/// 单个草稿的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftResult {
    Saved { url: String },
    Rejected { message: String },
    Failed { reason: String },
}

/// 处理统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub saved: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl ProcessingStats {
    fn record(&mut self, result: &DraftResult) {
        match result {
            DraftResult::Saved { .. } => self.saved += 1,
            DraftResult::Rejected { .. } => self.rejected += 1,
            DraftResult::Failed { .. } => self.failed += 1,
        }
    }
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file).context("无法初始化日志文件")?;

        log_startup(&config.server_base_url, config.lang.code());

        let client = QuizClient::new(&config).context("无法创建 HTTP 客户端")?;
        let locale = Locale::new(config.lang);

        Ok(Self {
            config,
            client: Arc::new(client),
            locale,
        })
    }

    /// 运行应用主逻辑：逐个提交草稿目录中的测验
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描测验草稿...");
        let drafts = load_all_drafts(&self.config.draft_folder)
            .await
            .with_context(|| format!("无法加载草稿目录: {}", self.config.draft_folder))?;

        if drafts.is_empty() {
            warn!("⚠️ 没有找到待提交的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_drafts_loaded(drafts.len());

        let mut stats = ProcessingStats::default();
        for (idx, draft) in drafts.iter().enumerate() {
            let result = self.process_draft(idx + 1, draft).await;
            stats.record(&result);
            if let Err(e) = self.append_log(draft, &result) {
                warn!("写入日志失败: {}", e);
            }
        }

        print_final_stats(
            stats.saved,
            stats.rejected,
            stats.failed,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 处理单个草稿：填表、预检、预览、保存
    pub async fn process_draft(&self, index: usize, draft: &QuizDraft) -> DraftResult {
        info!(
            "[草稿 {}] 📝 {} ({} 道题)",
            index,
            truncate_text(&draft.name, 40),
            draft.questions.len()
        );

        let mut controller = FormController::new(Arc::clone(&self.client), self.locale);
        if let Err(e) = draft.apply(&mut controller) {
            error!("[草稿 {}] ❌ 草稿无效: {}", index, e);
            return DraftResult::Failed {
                reason: e.to_string(),
            };
        }

        for problem in controller.form().to_quiz().validate(&self.locale) {
            warn!("[草稿 {}] 预检: {}", index, problem);
        }

        if let Some(folder) = &self.config.preview_folder {
            if let Err(e) = write_preview(folder, draft, &controller.render()) {
                warn!("[草稿 {}] 预览写入失败: {:#}", index, e);
            }
        }

        match controller.save_and_wait(draft.quiz_id).await {
            Ok(SaveOutcome::Redirect { url }) => DraftResult::Saved { url },
            Ok(SaveOutcome::Rejected { message }) => DraftResult::Rejected { message },
            Err(e) => DraftResult::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn append_log(&self, draft: &QuizDraft, result: &DraftResult) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_log_file)?;

        let line = match result {
            DraftResult::Saved { url } => format!("✅ {} → {}\n", draft.display_name(), url),
            DraftResult::Rejected { message } => format!(
                "⚠️ {} 被拒绝: {}\n",
                draft.display_name(),
                message.replace('\n', " | ")
            ),
            DraftResult::Failed { reason } => format!("❌ {} 失败: {}\n", draft.display_name(), reason),
        };
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

fn write_preview(folder: &str, draft: &QuizDraft, html: &str) -> Result<()> {
    std::fs::create_dir_all(folder).with_context(|| format!("无法创建目录: {}", folder))?;
    let path = Path::new(folder).join(format!("{}.html", draft.display_name()));
    std::fs::write(&path, html).with_context(|| format!("无法写入: {}", path.display()))?;
    Ok(())
}
