// ==========================================
// Repair Queens - 配件领域模型
// ==========================================
// 职责: 配件 (Part)、供应商引用、库存调整请求
// 红线: stockQuantity / minimumStockLevel 恒 ≥ 0（用无符号类型保证）
// ==========================================

use crate::domain::types::StockOperation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// SupplierRef - 供应商引用
// ==========================================
// 后端可能返回已展开的对象，也可能只返回名称字符串；仅保留名称用于展示/导出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupplierRef {
    Name(String),
    Populated { name: String },
}

impl SupplierRef {
    pub fn name(&self) -> &str {
        match self {
            SupplierRef::Name(name) => name,
            SupplierRef::Populated { name } => name,
        }
    }
}

// ==========================================
// Part - 配件
// ==========================================
// 对齐: 后端 JSON 字段（camelCase，主键可能为 _id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock_quantity: u32, // 当前库存
    #[serde(default)]
    pub minimum_stock_level: u32, // 补货阈值
    #[serde(default)]
    pub price: f64, // 单价（RON）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
}

impl Part {
    /// 是否需要补货
    ///
    /// minimumStockLevel == 0 的配件永远不需要补货
    pub fn needs_restock(&self) -> bool {
        self.minimum_stock_level > 0 && self.stock_quantity <= self.minimum_stock_level
    }

    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier.as_ref().map(|s| s.name())
    }
}

// ==========================================
// StockAdjustment - 库存调整请求
// ==========================================
// 对齐: PUT 库存接口请求体 {quantity, operation, reason}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub quantity: u32,
    pub operation: StockOperation,
    pub reason: String,
}

/// 库存调整校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockAdjustmentError {
    #[error("调整数量必须大于 0")]
    ZeroQuantity,

    #[error("调整原因不能为空")]
    MissingReason,

    #[error("出库数量 {requested} 超过当前库存 {available}")]
    InsufficientStock { requested: u32, available: u32 },
}

impl StockAdjustment {
    pub fn new(quantity: u32, operation: StockOperation, reason: impl Into<String>) -> Self {
        Self {
            quantity,
            operation,
            reason: reason.into(),
        }
    }

    /// 发送前校验（不依赖当前库存）
    pub fn validate(&self) -> Result<(), StockAdjustmentError> {
        if self.quantity == 0 {
            return Err(StockAdjustmentError::ZeroQuantity);
        }
        if self.reason.trim().is_empty() {
            return Err(StockAdjustmentError::MissingReason);
        }
        Ok(())
    }

    /// 预览调整后的库存
    pub fn apply_to(&self, current: u32) -> Result<u32, StockAdjustmentError> {
        self.validate()?;
        match self.operation {
            StockOperation::Add => Ok(current.saturating_add(self.quantity)),
            StockOperation::Subtract => {
                current
                    .checked_sub(self.quantity)
                    .ok_or(StockAdjustmentError::InsufficientStock {
                        requested: self.quantity,
                        available: current,
                    })
            }
            StockOperation::Set => Ok(self.quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_deserialize_backend_shape() {
        let raw = json!({
            "_id": "64f0c0ffee",
            "name": "Filtru ulei",
            "category": "filters",
            "stockQuantity": 2,
            "minimumStockLevel": 10,
            "price": 35.5,
            "partNumber": "OF-123",
            "supplier": { "_id": "s1", "name": "AutoParts SRL" }
        });

        let part: Part = serde_json::from_value(raw).unwrap();
        assert_eq!(part.id, "64f0c0ffee");
        assert_eq!(part.stock_quantity, 2);
        assert_eq!(part.supplier_name(), Some("AutoParts SRL"));
    }

    #[test]
    fn test_part_negative_stock_rejected() {
        let raw = json!({ "id": "p1", "name": "x", "stockQuantity": -1 });
        assert!(serde_json::from_value::<Part>(raw).is_err(), "负库存应被拒绝");
    }

    #[test]
    fn test_needs_restock_zero_minimum() {
        let raw = json!({ "id": "p1", "name": "x", "stockQuantity": 0, "minimumStockLevel": 0 });
        let part: Part = serde_json::from_value(raw).unwrap();
        assert!(!part.needs_restock(), "最低库存为 0 的配件永不需要补货");
    }

    #[test]
    fn test_stock_adjustment_apply() {
        let add = StockAdjustment::new(5, StockOperation::Add, "receptie");
        assert_eq!(add.apply_to(3), Ok(8));

        let set = StockAdjustment::new(12, StockOperation::Set, "inventar");
        assert_eq!(set.apply_to(3), Ok(12));

        let sub = StockAdjustment::new(4, StockOperation::Subtract, "montaj");
        assert_eq!(
            sub.apply_to(3),
            Err(StockAdjustmentError::InsufficientStock { requested: 4, available: 3 })
        );
    }

    #[test]
    fn test_stock_adjustment_validate() {
        assert_eq!(
            StockAdjustment::new(0, StockOperation::Add, "x").validate(),
            Err(StockAdjustmentError::ZeroQuantity)
        );
        assert_eq!(
            StockAdjustment::new(1, StockOperation::Add, "  ").validate(),
            Err(StockAdjustmentError::MissingReason)
        );
    }
}
