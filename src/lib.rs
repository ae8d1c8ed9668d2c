//! # Quiz Form
//!
//! 测验编辑表单的控制器与保存客户端
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/form` - 内存中的表单：题目块、选项行、拖拽排序绑定，唯一的数据来源
//! - `models/quiz` - 保存载荷 `{ 测验名: { 题目: { 选项: 是否正确 } } }`，保持插入顺序
//! - `models/response` - 服务端返回与保存目标
//! - `models/loaders` - TOML 测验草稿
//!
//! ### ② 客户端层（Clients）
//! - `QuizClient` - POST `/create` 或 `/{id}/edit`
//!
//! ### ③ 控制器（Controller）
//! - `FormController` - 增删题目、排序、异步保存、跳转与错误横幅
//!
//! ### ④ 视图（Render / Locale）
//! - `render` - 表单的 HTML 渲染
//! - `locale` - 本地化字符串
//!
//! ### ⑤ 编排层（App）
//! - `App` - 读取草稿目录，逐个填表并提交

pub mod app;
pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod locale;
pub mod models;
pub mod render;
pub mod utils;

// 重新导出常用类型
pub use app::{App, DraftResult, ProcessingStats};
pub use clients::QuizClient;
pub use config::Config;
pub use controller::{FormController, SaveState};
pub use error::{AppError, AppResult};
pub use locale::{Lang, Locale};
pub use models::{BlockId, Quiz, QuizForm, SaveOutcome, SaveResponse, SaveTarget};
