// ==========================================
// Repair Queens - 配置层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),

    #[error("配置值格式错误 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
