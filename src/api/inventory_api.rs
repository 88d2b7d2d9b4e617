// ==========================================
// Repair Queens - 库存 API
// ==========================================
// 职责: 加载低库存配件、提交库存调整、同步看板状态
// 架构: API 层 → ApiClient（后端）+ TriageEngine（本地规则）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::client::{ApiClient, ApiResponse};
use crate::config::AppConfig;
use crate::domain::part::{Part, StockAdjustment};
use crate::engine::triage::LowStockBoard;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

pub struct InventoryApi {
    client: ApiClient,
    config: AppConfig,
}

impl InventoryApi {
    pub fn new(client: ApiClient, config: &AppConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    fn ensure_authenticated(&self) -> ApiResult<()> {
        if self.client.has_credential() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }

    /// 检查响应: 非 2xx → Backend; success=false → BusinessRuleViolation
    fn check_response(response: &ApiResponse) -> ApiResult<()> {
        if !response.is_http_success() {
            return Err(ApiError::Backend {
                status: response.status,
                message: response.message().unwrap_or_default().to_string(),
            });
        }
        if !response.is_logical_success() {
            return Err(ApiError::BusinessRuleViolation(
                response.message().unwrap_or("操作失败").to_string(),
            ));
        }
        Ok(())
    }

    /// 加载低库存配件并构建看板
    ///
    /// 响应解包顺序: `parts` → `data` → 整个响应体; 无法解析的配件跳过并记录日志
    #[instrument(skip(self))]
    pub async fn load_low_stock(&self) -> ApiResult<LowStockBoard> {
        self.ensure_authenticated()?;

        let response = self.client.get(&self.config.low_stock_path).await?;
        Self::check_response(&response)?;

        let parts = parse_parts(&response.body);
        info!(count = parts.len(), "低库存配件已加载");
        Ok(LowStockBoard::new(parts))
    }

    /// 提交库存调整，成功后同步看板中的库存
    ///
    /// # 返回
    /// - Ok(u32): 调整后的库存（优先取后端返回值，否则取本地预览值）
    #[instrument(skip(self, board, adjustment), fields(operation = %adjustment.operation, quantity = adjustment.quantity))]
    pub async fn adjust_stock(
        &self,
        board: &mut LowStockBoard,
        part_id: &str,
        adjustment: &StockAdjustment,
    ) -> ApiResult<u32> {
        self.ensure_authenticated()?;
        adjustment.validate()?;

        let current = board
            .parts()
            .iter()
            .find(|p| p.id == part_id)
            .map(|p| p.stock_quantity)
            .ok_or_else(|| ApiError::NotFound(format!("配件(id={})", part_id)))?;
        let preview = adjustment.apply_to(current)?;

        let path = self.config.stock_update_path_for(part_id);
        let body = json!({
            "quantity": adjustment.quantity,
            "operation": adjustment.operation,
            "reason": adjustment.reason,
        });
        let response = self.client.put(&path, body).await?;
        Self::check_response(&response)?;

        let new_stock = returned_stock(&response.body).unwrap_or(preview);
        board.update_stock(part_id, new_stock);
        info!(part_id, from = current, to = new_stock, "库存已调整");
        Ok(new_stock)
    }
}

/// 解析配件列表（逐条解析，坏数据跳过）
fn parse_parts(body: &Value) -> Vec<Part> {
    let items = ["parts", "data"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|v| v.is_array())
        .unwrap_or(body);

    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match serde_json::from_value::<Part>(item.clone()) {
                    Ok(part) => Some(part),
                    Err(e) => {
                        warn!(error = %e, "跳过无法解析的配件");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 后端返回的最新库存: `part.stockQuantity` 或 `data.stockQuantity`
fn returned_stock(body: &Value) -> Option<u32> {
    ["part", "data"]
        .iter()
        .filter_map(|key| body.get(*key))
        .filter_map(|v| v.get("stockQuantity"))
        .find_map(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}
