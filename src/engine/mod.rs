// ==========================================
// Repair Queens - 引擎层
// ==========================================
// 职责: 纯业务规则，不做 I/O
// ==========================================

pub mod calendar;
pub mod triage;

// 重导出核心引擎
pub use calendar::{build_month_grid, DayCell, MonthGrid};
pub use triage::{
    CategoryFilter, FilterCriteria, LowStockBoard, TriageEngine, TriageSummary, UrgencyFilter,
};
