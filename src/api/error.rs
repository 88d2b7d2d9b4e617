// ==========================================
// Repair Queens - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向用户的单条提示
// ==========================================

use crate::client::TransportError;
use crate::config::ConfigError;
use crate::domain::part::StockAdjustmentError;
use crate::export::ExportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 会话错误
    // ==========================================
    #[error("未登录或会话已过期，请重新登录")]
    Unauthenticated,

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("已有导出任务正在进行，请稍候")]
    ExportInProgress,

    // ==========================================
    // 下游错误
    // ==========================================
    #[error("后端返回错误 (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl From<StockAdjustmentError> for ApiError {
    fn from(err: StockAdjustmentError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl ApiError {
    /// 面向用户的提示文本（界面只展示这一条）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Export(ExportError::NoSelection) => self.to_string(),
            ApiError::Export(e) => format!("导出失败: {}", e),
            ApiError::Transport(e) => format!("无法连接服务器: {}", e),
            other => other.to_string(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
