// ==========================================
// Repair Queens - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 批量接口不可用不是错误（见 fetch::BulkOutcome），只触发回退
// ==========================================

use crate::domain::types::ResourceType;
use thiserror::Error;

/// 导出模块错误类型（任一硬错误都会中止整个导出，不产出部分文件）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("请至少选择一种导出数据类型")]
    NoSelection,

    #[error("获取 {resource} 数据失败 ({})", describe_status(.status, .detail))]
    FetchFailed {
        resource: ResourceType,
        /// HTTP 状态码; None 表示未拿到响应
        status: Option<u16>,
        detail: String,
    },

    #[error("获取 {resource} 数据失败: {message}")]
    LogicalFailure {
        resource: ResourceType,
        message: String,
    },

    #[error("导出序列化失败: {0}")]
    Serialization(String),

    #[error("文件保存失败 ({filename}): {message}")]
    Sink { filename: String, message: String },
}

fn describe_status(status: &Option<u16>, detail: &str) -> String {
    match *status {
        Some(code) if detail.is_empty() => format!("HTTP {}", code),
        Some(code) => format!("HTTP {}: {}", code, detail),
        None => detail.to_string(),
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
