// ==========================================
// Repair Queens - 导出数据抓取策略
// ==========================================
// 策略1: 批量接口（多于一种资源时尝试），结果分类为 Success / Unavailable
// 策略2: 逐资源顺序抓取（批量不可用或只选了一种资源）
// ==========================================

use crate::client::ApiClient;
use crate::domain::export::{ExportBundle, Record};
use crate::domain::types::ResourceType;
use crate::export::error::{ExportError, ExportResult};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// 资源路径模板中的占位符
const RESOURCE_PLACEHOLDER: &str = "{resource}";

// ==========================================
// ExportEndpoints - 导出接口路径
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEndpoints {
    pub bulk_path: String,
    /// 逐资源路径模板，如 /export/{resource}
    pub resource_path_template: String,
}

impl Default for ExportEndpoints {
    fn default() -> Self {
        Self {
            bulk_path: "/export/all".to_string(),
            resource_path_template: "/export/{resource}".to_string(),
        }
    }
}

impl ExportEndpoints {
    pub fn resource_path(&self, resource: ResourceType) -> String {
        self.resource_path_template
            .replace(RESOURCE_PLACEHOLDER, resource.tag())
    }
}

// ==========================================
// 批量抓取
// ==========================================

/// 批量抓取结果（不可用不是错误，只触发回退）
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    Success(ExportBundle),
    Unavailable(String),
}

/// 尝试批量接口; 成功时只切出请求的资源类型（缺失的类型记为空）
pub async fn fetch_bulk(
    client: &ApiClient,
    endpoints: &ExportEndpoints,
    resources: &BTreeSet<ResourceType>,
) -> BulkOutcome {
    let response = match client.get(&endpoints.bulk_path).await {
        Ok(response) => response,
        Err(e) => return BulkOutcome::Unavailable(e.to_string()),
    };

    if !response.is_http_success() {
        return BulkOutcome::Unavailable(format!("HTTP {}", response.status));
    }
    if !response.is_logical_success() {
        return BulkOutcome::Unavailable(
            response.message().unwrap_or("批量接口返回失败").to_string(),
        );
    }

    let data = match response.body.get("data").and_then(Value::as_object) {
        Some(data) => data,
        None => return BulkOutcome::Unavailable("批量接口响应中无数据".to_string()),
    };

    let mut bundle = ExportBundle::new();
    for resource in resources {
        let records = data
            .get(resource.tag())
            .map(coerce_records)
            .unwrap_or_default();
        bundle.insert(*resource, records);
    }
    BulkOutcome::Success(bundle)
}

// ==========================================
// 逐资源抓取
// ==========================================

/// 抓取单个资源
///
/// # 错误
/// - FetchFailed: 传输失败或非 2xx
/// - LogicalFailure: 2xx 但响应体 success=false
pub async fn fetch_resource(
    client: &ApiClient,
    endpoints: &ExportEndpoints,
    resource: ResourceType,
) -> ExportResult<Vec<Record>> {
    let path = endpoints.resource_path(resource);
    debug!(resource = %resource, path = %path, "抓取单个资源");

    let response = client
        .get(&path)
        .await
        .map_err(|e| ExportError::FetchFailed {
            resource,
            status: None,
            detail: e.to_string(),
        })?;

    if !response.is_http_success() {
        return Err(ExportError::FetchFailed {
            resource,
            status: Some(response.status),
            detail: response.message().unwrap_or_default().to_string(),
        });
    }

    if !response.is_logical_success() {
        return Err(ExportError::LogicalFailure {
            resource,
            message: response.message().unwrap_or("未知错误").to_string(),
        });
    }

    Ok(unwrap_records(&response.body, resource))
}

/// 响应解包
///
/// 依次尝试 `data`、资源名字段（如 `parts`）; 都没有则把整个响应体当作记录序列。
/// 非数组结果视为空序列。
pub fn unwrap_records(body: &Value, resource: ResourceType) -> Vec<Record> {
    let payload = ["data", resource.tag()]
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|v| !v.is_null())
        .unwrap_or(body);
    coerce_records(payload)
}

/// 数组 → 记录序列（非对象元素跳过）; 非数组 → 空
fn coerce_records(value: &Value) -> Vec<Record> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        None => Vec::new(),
    }
}
