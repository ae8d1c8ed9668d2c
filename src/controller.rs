//! 表单控制器
//!
//! 负责题目块的增删、拖拽排序绑定、保存请求以及结果处理（跳转或错误横幅）。
//! 保存请求在单独的 tokio 任务中执行，进行期间状态为 `Saving`，
//! 离开页面时可以取消。

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clients::QuizClient;
use crate::error::{AppError, AppResult, FormError};
use crate::locale::Locale;
use crate::models::{
    BlockId, DragTarget, QuizForm, ReorderBinding, SaveOutcome, SaveResponse, SaveTarget,
};
use crate::render::{self, Banner};

/// 保存状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    Rejected,
    Failed,
    Cancelled,
}

/// 表单控制器
pub struct FormController {
    form: QuizForm,
    locale: Locale,
    client: Arc<QuizClient>,
    binding: Option<ReorderBinding>,
    binding_generation: u64,
    banner: Option<Banner>,
    location: Option<String>,
    state: SaveState,
    pending: Option<JoinHandle<AppResult<SaveResponse>>>,
}

impl FormController {
    /// 创建控制器，并立即初始化拖拽排序
    pub fn new(client: Arc<QuizClient>, locale: Locale) -> Self {
        let mut controller = Self {
            form: QuizForm::new(),
            locale,
            client,
            binding: None,
            binding_generation: 0,
            banner: None,
            location: None,
            state: SaveState::Idle,
            pending: None,
        };
        controller.sort_questions();
        controller
    }

    pub fn form(&self) -> &QuizForm {
        &self.form
    }

    pub fn binding(&self) -> Option<&ReorderBinding> {
        self.binding.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// 成功保存后跳转到的地址
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == SaveState::Saving
    }

    // ========== 结构操作 ==========

    /// 追加新的题目块，并重新绑定拖拽排序
    pub fn add_question(&mut self) -> BlockId {
        let id = self.form.add_block();
        debug!("添加题目块 #{} (序号 {})", id, self.form.len());
        self.sort_questions();
        id
    }

    /// 删除题目块
    pub fn remove_row(&mut self, id: BlockId) -> Result<(), FormError> {
        self.form.remove_block(id)?;
        debug!("删除题目块 #{}，剩余 {} 个", id, self.form.len());
        Ok(())
    }

    /// 重新初始化拖拽排序，替换之前的绑定
    pub fn sort_questions(&mut self) {
        self.binding_generation += 1;
        self.binding = Some(ReorderBinding::new(self.binding_generation));
    }

    /// 执行一次拖拽，返回是否实际移动
    ///
    /// 按住带 `ignore-drag` 标记的元素时不会发起拖拽
    pub fn move_question(
        &mut self,
        id: BlockId,
        to_index: usize,
        grabbed: DragTarget,
    ) -> Result<bool, FormError> {
        let accepts = self.binding.map(|b| b.accepts(grabbed)).unwrap_or(false);
        if !accepts {
            return Ok(false);
        }
        self.form.move_block(id, to_index)?;
        Ok(true)
    }

    // ========== 编辑操作 ==========

    pub fn set_quiz_name(&mut self, name: impl Into<String>) {
        self.form.set_name(name);
    }

    pub fn set_question_text(&mut self, id: BlockId, text: impl Into<String>) -> Result<(), FormError> {
        self.form.set_question_text(id, text)
    }

    pub fn set_option_text(
        &mut self,
        id: BlockId,
        row: usize,
        text: impl Into<String>,
    ) -> Result<(), FormError> {
        self.form.set_option_text(id, row, text)
    }

    pub fn select_correct(&mut self, id: BlockId, row: usize) -> Result<(), FormError> {
        self.form.select_correct(id, row)
    }

    // ========== 保存 ==========

    /// 开始保存：生成载荷快照并在后台任务中发送
    ///
    /// `quiz_id` 为空时新建，否则编辑
    pub fn save_quiz(&mut self, quiz_id: Option<u64>) -> Result<(), FormError> {
        if self.is_saving() {
            return Err(FormError::SaveInProgress);
        }

        let target = SaveTarget::from_quiz_id(quiz_id);
        let quiz = self.form.to_quiz();
        let client = Arc::clone(&self.client);

        info!(
            "💾 保存测验 \"{}\" ({} 道题) → {}",
            quiz.name,
            quiz.questions.len(),
            target.path()
        );

        self.state = SaveState::Saving;
        self.pending = Some(tokio::spawn(async move {
            client.post_quiz(target, &quiz).await
        }));
        Ok(())
    }

    /// 等待进行中的保存请求并处理结果
    pub async fn finish_save(&mut self) -> AppResult<SaveOutcome> {
        let handle = self.pending.take().ok_or(FormError::NoPendingSave)?;

        let response = match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => {
                self.state = SaveState::Cancelled;
                return Err(AppError::Other("保存请求已取消".to_string()));
            }
            Err(join_err) => Err(AppError::Other(format!("保存任务异常: {}", join_err))),
        };

        match response {
            Ok(response) => Ok(self.apply_response(response)),
            Err(e) => {
                error!("❌ 保存请求失败: {}", e);
                self.state = SaveState::Failed;
                Err(e)
            }
        }
    }

    /// 保存并等待结果
    pub async fn save_and_wait(&mut self, quiz_id: Option<u64>) -> AppResult<SaveOutcome> {
        self.save_quiz(quiz_id)?;
        self.finish_save().await
    }

    /// 处理服务端返回：成功则跳转，否则替换错误横幅
    pub fn apply_response(&mut self, response: SaveResponse) -> SaveOutcome {
        let outcome = response.into_outcome();
        match &outcome {
            SaveOutcome::Redirect { url } => {
                info!("✓ 保存成功，跳转到 {}", url);
                self.location = Some(url.clone());
                self.state = SaveState::Saved;
            }
            SaveOutcome::Rejected { message } => {
                warn!("⚠️ 服务端拒绝保存: {}", message);
                self.banner = Some(Banner::new(message.clone()));
                self.state = SaveState::Rejected;
            }
        }
        outcome
    }

    /// 离开页面：取消进行中的保存
    pub fn navigate_away(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            info!("保存请求已随页面离开取消");
            self.state = SaveState::Cancelled;
        }
    }

    /// 渲染当前表单
    pub fn render(&self) -> String {
        render::render_form(&self.form, self.banner.as_ref(), &self.locale).into_string()
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
