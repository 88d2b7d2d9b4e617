// ==========================================
// Repair Queens - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod export;
pub mod part;
pub mod session;
pub mod types;

// 重导出核心类型
pub use export::{ExportBundle, ExportRequest, Record};
pub use part::{Part, StockAdjustment, StockAdjustmentError, SupplierRef};
pub use session::SessionUser;
pub use types::{ExportFormat, ResourceType, SortKey, StockOperation, UrgencyTier, UserRole};
