// ==========================================
// Repair Queens - 应用层
// ==========================================
// 职责: 组装配置、会话与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
