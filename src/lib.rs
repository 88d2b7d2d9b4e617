// ==========================================
// Repair Queens - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 范围: 低库存分级看板 + 多资源数据导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 客户端层 - 后端调用
pub mod client;

// 导出层 - 抓取/序列化/落地
pub mod export;

// 导入层 - 外部配件清单
pub mod importer;

// 配置层 - 系统配置与会话
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ExportFormat, ResourceType, SortKey, StockOperation, UrgencyTier, UserRole};

// 领域实体
pub use domain::{ExportBundle, ExportRequest, Part, Record, SessionUser, StockAdjustment};

// 引擎
pub use engine::{build_month_grid, FilterCriteria, LowStockBoard, MonthGrid, TriageEngine, TriageSummary};

// 导出
pub use export::{ExportError, ExportOutcome, ExportPipeline};

// API
pub use api::{ApiError, ExportApi, InventoryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Repair Queens";
