// ==========================================
// Repair Queens - 配置层
// ==========================================
// 职责: 系统配置管理 + 本地会话存储
// 存储: config_kv / session_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod session_store;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_export_dir, AppConfig, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use session_store::SessionStore;
