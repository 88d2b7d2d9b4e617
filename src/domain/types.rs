// ==========================================
// Repair Queens - 领域类型定义
// ==========================================
// 职责: 紧急等级、导出资源类型、导出格式、排序键等枚举
// 红线: 紧急等级是"等级制",永远由库存字段实时推导,不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 紧急等级 (Urgency Tier)
// ==========================================
// 顺序: Critical < High < Medium（按严重程度排序，越小越紧急）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Critical, // 缺货 (stockQuantity == 0)
    High,     // 严重不足 (≤ 最低库存的一半)
    Medium,   // 低于最低库存
}

impl UrgencyTier {
    /// 严重程度序号: critical(0) < high(1) < medium(2)
    pub fn severity_rank(&self) -> u8 {
        match self {
            UrgencyTier::Critical => 0,
            UrgencyTier::High => 1,
            UrgencyTier::Medium => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "critical",
            UrgencyTier::High => "high",
            UrgencyTier::Medium => "medium",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrgencyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(UrgencyTier::Critical),
            "high" => Ok(UrgencyTier::High),
            "medium" => Ok(UrgencyTier::Medium),
            other => Err(format!("未知紧急等级: {}", other)),
        }
    }
}

// ==========================================
// 导出资源类型 (Resource Type)
// ==========================================
// 固定枚举集合; 声明顺序即导出/进度上报顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Appointments,
    Parts,
    Suppliers,
    Orders,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Appointments,
        ResourceType::Parts,
        ResourceType::Suppliers,
        ResourceType::Orders,
    ];

    /// 资源标签（同时也是接口响应里的别名字段名）
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceType::Appointments => "appointments",
            ResourceType::Parts => "parts",
            ResourceType::Suppliers => "suppliers",
            ResourceType::Orders => "orders",
        }
    }

    /// 展示标题（HTML 导出的小节标题）
    pub fn title(&self) -> &'static str {
        match self {
            ResourceType::Appointments => "Appointments",
            ResourceType::Parts => "Parts",
            ResourceType::Suppliers => "Suppliers",
            ResourceType::Orders => "Orders",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "appointments" => Ok(ResourceType::Appointments),
            "parts" => Ok(ResourceType::Parts),
            "suppliers" => Ok(ResourceType::Suppliers),
            "orders" => Ok(ResourceType::Orders),
            other => Err(format!("未知资源类型: {}", other)),
        }
    }
}

// ==========================================
// 导出格式 (Export Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Pdf, // HTML 替代文档，由浏览器"打印为 PDF"
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "text/html;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("未知导出格式: {}", other)),
        }
    }
}

// ==========================================
// 低库存列表排序键 (Sort Key)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Urgency,       // 严重程度升序
    Name,          // 名称升序
    StockQuantity, // 库存升序
    Price,         // 价格降序（唯一的降序键）
}

impl SortKey {
    /// 宽松解析: 未知键返回 None（调用方据此保持原顺序）
    pub fn parse(key: &str) -> Option<SortKey> {
        match key.trim() {
            "urgency" => Some(SortKey::Urgency),
            "name" => Some(SortKey::Name),
            "stockQuantity" | "stock_quantity" => Some(SortKey::StockQuantity),
            "price" => Some(SortKey::Price),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Urgency => write!(f, "urgency"),
            SortKey::Name => write!(f, "name"),
            SortKey::StockQuantity => write!(f, "stockQuantity"),
            SortKey::Price => write!(f, "price"),
        }
    }
}

// ==========================================
// 库存变更操作 (Stock Operation)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Add,
    Subtract,
    Set,
}

impl fmt::Display for StockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockOperation::Add => write!(f, "add"),
            StockOperation::Subtract => write!(f, "subtract"),
            StockOperation::Set => write!(f, "set"),
        }
    }
}

impl FromStr for StockOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(StockOperation::Add),
            "subtract" => Ok(StockOperation::Subtract),
            "set" => Ok(StockOperation::Set),
            other => Err(format!("未知库存操作: {}", other)),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Manager,
    Accountant,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Client => write!(f, "client"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Accountant => write!(f, "accountant"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}
