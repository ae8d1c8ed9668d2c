/// 测验服务器 API 客户端
///
/// 封装保存测验（新建 / 编辑）的 HTTP 调用
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{Quiz, SaveResponse, SaveTarget};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// 测验服务器客户端
#[derive(Debug, Clone)]
pub struct QuizClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuizClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.server_base_url, e))?;

        Ok(Self {
            http,
            base_url: config.server_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 保存测验
    ///
    /// # 参数
    /// - `target`: 新建或编辑
    /// - `quiz`: 要提交的测验
    ///
    /// # 返回
    /// 返回服务端的 JSON 结果，不区分成功与拒绝
    pub async fn post_quiz(&self, target: SaveTarget, quiz: &Quiz) -> AppResult<SaveResponse> {
        let endpoint = format!("{}{}", self.base_url, target.path());
        let body = quiz.to_json()?;

        debug!("Sending POST {} with JSON: {}", endpoint, body);

        let response = self
            .http
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        // 非 2xx 但 body 仍是预期格式时照常解析
        let parsed: SaveResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ApiError::BadStatus {
                    endpoint,
                    status: status.as_u16(),
                }
                .into())
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Got answer from the server: {:?}", parsed);

        Ok(parsed)
    }
}
