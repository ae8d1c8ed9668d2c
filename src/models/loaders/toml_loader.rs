use crate::controller::FormController;
use crate::error::{AppError, AppResult, FileError, FormError};
use crate::models::form::OPTIONS_PER_QUESTION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 草稿中的一道题
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftQuestion {
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// 正确选项的行号（从 1 开始）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<usize>,
}

/// TOML 测验草稿
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDraft {
    pub name: String,
    /// 存在时以编辑模式保存
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<u64>,
    #[serde(default)]
    pub questions: Vec<DraftQuestion>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl QuizDraft {
    /// 通过控制器的公开操作把草稿填进表单
    pub fn apply(&self, controller: &mut FormController) -> Result<(), FormError> {
        controller.set_quiz_name(self.name.clone());
        for question in &self.questions {
            if question.options.len() > OPTIONS_PER_QUESTION {
                return Err(FormError::TooManyOptions {
                    count: question.options.len(),
                    max: OPTIONS_PER_QUESTION,
                });
            }

            let id = controller.add_question();
            controller.set_question_text(id, question.text.clone())?;
            for (row, option) in question.options.iter().enumerate() {
                controller.set_option_text(id, row, option.clone())?;
            }
            if let Some(correct) = question.correct {
                if !(1..=OPTIONS_PER_QUESTION).contains(&correct) {
                    return Err(FormError::InvalidCorrectRow {
                        row: correct,
                        max: OPTIONS_PER_QUESTION,
                    });
                }
                controller.select_correct(id, correct - 1)?;
            }
        }
        Ok(())
    }

    /// 用于日志和预览文件名
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|p| Path::new(p).file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// 解析 TOML 字符串
pub fn parse_draft(content: &str, path: &str) -> AppResult<QuizDraft> {
    toml::from_str(content).map_err(|source| {
        AppError::File(FileError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    })
}

/// 从 TOML 文件加载测验草稿
pub async fn load_draft(toml_file_path: &Path) -> AppResult<QuizDraft> {
    let path_str = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let mut draft = parse_draft(&content, &path_str)?;
    draft.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(draft)
}

/// 加载文件夹中所有 TOML 草稿，按文件名排序，解析失败的文件跳过
pub async fn load_all_drafts(folder_path: &str) -> AppResult<Vec<QuizDraft>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    let mut toml_files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut drafts = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_draft(&path).await {
            Ok(draft) => {
                tracing::info!("成功加载 {} 个题目", draft.questions.len());
                drafts.push(draft);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(drafts)
}
