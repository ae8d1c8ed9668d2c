use serde::{Deserialize, Serialize};

/// 保存接口的返回体
///
/// 服务端失败时可能完全不带 `result` 字段，所以全部可选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some("success")
    }

    /// 转换为控制器可处理的结果
    pub fn into_outcome(self) -> SaveOutcome {
        if self.is_success() {
            SaveOutcome::Redirect {
                url: self.url.unwrap_or_default(),
            }
        } else {
            SaveOutcome::Rejected {
                message: self.error.unwrap_or_default(),
            }
        }
    }
}

/// 保存结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 保存成功，跳转到指定地址
    Redirect { url: String },
    /// 服务端拒绝，显示错误横幅
    Rejected { message: String },
}

/// 保存目标：新建或编辑已有测验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Edit(u64),
}

impl SaveTarget {
    pub fn from_quiz_id(quiz_id: Option<u64>) -> Self {
        match quiz_id {
            Some(id) => SaveTarget::Edit(id),
            None => SaveTarget::Create,
        }
    }

    /// 接口路径
    pub fn path(self) -> String {
        match self {
            SaveTarget::Create => "/create".to_string(),
            SaveTarget::Edit(id) => format!("/{}/edit", id),
        }
    }
}
