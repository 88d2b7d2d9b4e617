// ==========================================
// Repair Queens - 配件字段映射器
// ==========================================
// 职责: 原始行 → Part（列名别名 + 类型转换）
// ==========================================

use crate::domain::part::{Part, SupplierRef};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use uuid::Uuid;

/// 标准字段 → 可接受的列名
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("id", &["id", "_id", "ID"]),
    ("name", &["name", "Name", "denumire"]),
    ("category", &["category", "Category", "categorie"]),
    ("stockQuantity", &["stockQuantity", "stock_quantity", "stock", "Stock"]),
    (
        "minimumStockLevel",
        &["minimumStockLevel", "minimum_stock_level", "min_stock", "minStock"],
    ),
    ("price", &["price", "Price", "pret"]),
    ("partNumber", &["partNumber", "part_number", "cod"]),
    ("supplier", &["supplier", "Supplier", "furnizor"]),
];

pub struct PartMapper;

impl PartMapper {
    /// 映射一行
    ///
    /// # 规则
    /// - name 必填
    /// - 数量字段必须是非负整数，price 必须是非负数
    /// - id 缺失时生成 UUID
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<Part> {
        let name = self
            .get_string(row, "name")
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "name".to_string(),
            })?;

        Ok(Part {
            id: self
                .get_string(row, "id")
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name,
            category: self.get_string(row, "category").unwrap_or_default(),
            stock_quantity: self.parse_quantity(row, "stockQuantity", row_number)?,
            minimum_stock_level: self.parse_quantity(row, "minimumStockLevel", row_number)?,
            price: self.parse_price(row, row_number)?,
            part_number: self.get_string(row, "partNumber"),
            supplier: self.get_string(row, "supplier").map(SupplierRef::Name),
        })
    }

    /// 提取字符串字段，按别名依次尝试，空白视为缺失
    fn get_string(&self, row: &RawRow, field: &str) -> Option<String> {
        let aliases = FIELD_ALIASES
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[]);

        aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// 解析数量（缺失视为 0）
    fn parse_quantity(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<u32> {
        let Some(value) = self.get_string(row, field) else {
            return Ok(0);
        };

        // Excel 数字单元格会渲染成 "12" 或 "12.0"
        let number = value
            .parse::<f64>()
            .map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("无法解析为整数: {}", value),
            })?;

        if number < 0.0 {
            return Err(ImportError::NegativeValue {
                row: row_number,
                field: field.to_string(),
                value,
            });
        }
        if number.fract() != 0.0 || number > f64::from(u32::MAX) {
            return Err(ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("无法解析为整数: {}", value),
            });
        }

        Ok(number as u32)
    }

    /// 解析单价（缺失视为 0）
    fn parse_price(&self, row: &RawRow, row_number: usize) -> ImportResult<f64> {
        let Some(value) = self.get_string(row, "price") else {
            return Ok(0.0);
        };

        let price = value
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row_number,
                field: "price".to_string(),
                message: format!("无法解析为浮点数: {}", value),
            })?;

        if price < 0.0 {
            return Err(ImportError::NegativeValue {
                row: row_number,
                field: "price".to_string(),
                value,
            });
        }
        Ok(price)
    }
}
