// ==========================================
// Repair Queens - API 层
// ==========================================
// 职责: 面向界面/命令行的业务入口
// ==========================================

pub mod error;
pub mod export_api;
pub mod inventory_api;

pub use error::{ApiError, ApiResult};
pub use export_api::ExportApi;
pub use inventory_api::InventoryApi;
