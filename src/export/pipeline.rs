// ==========================================
// Repair Queens - 多资源导出流水线
// ==========================================
// 流程:
// 1) 未选择任何资源 → NoSelection（不发起任何请求）
// 2) 多于一种资源 → 尝试批量接口，成功则跳过第 3 步
// 3) 逐资源顺序抓取，每完成一个上报进度
// 4) 任一资源失败 → 中止，丢弃已抓取数据
// 5) 序列化并交给下载落地
// ==========================================
// 约束: 同一时刻只运行一个导出（由 ExportApi 保证）; 无取消、无超时、无自动重试
// ==========================================

use crate::client::ApiClient;
use crate::domain::export::{ExportBundle, ExportRequest};
use crate::export::error::{ExportError, ExportResult};
use crate::export::fetch::{fetch_bulk, fetch_resource, BulkOutcome, ExportEndpoints};
use crate::export::progress::{percent_complete, ExportProgressObserver};
use crate::export::serializer::{serialize_bundle, DEFAULT_PDF_ROW_LIMIT};
use crate::export::sink::DownloadSink;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 一次导出的结果
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub bundle: ExportBundle,
    /// 已交给下载落地的文件名
    pub files: Vec<String>,
    /// 是否由批量接口一次取得
    pub used_bulk: bool,
}

// ==========================================
// ExportPipeline - 导出流水线
// ==========================================
pub struct ExportPipeline {
    client: ApiClient,
    endpoints: ExportEndpoints,
    sink: Arc<dyn DownloadSink>,
    row_limit: usize,
}

impl ExportPipeline {
    pub fn new(client: ApiClient, endpoints: ExportEndpoints, sink: Arc<dyn DownloadSink>) -> Self {
        Self {
            client,
            endpoints,
            sink,
            row_limit: DEFAULT_PDF_ROW_LIMIT,
        }
    }

    /// 客户端是否持有会话令牌
    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    /// HTML 导出每种资源的最大行数
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// 抓取阶段: 构建完整的 ExportBundle
    ///
    /// # 返回
    /// - Ok((bundle, used_bulk))
    /// - Err: NoSelection / FetchFailed / LogicalFailure
    pub async fn fetch_bundle(
        &self,
        request: &ExportRequest,
        observer: &dyn ExportProgressObserver,
    ) -> ExportResult<(ExportBundle, bool)> {
        if request.is_empty() {
            return Err(ExportError::NoSelection);
        }

        if request.wants_bulk() {
            match fetch_bulk(&self.client, &self.endpoints, &request.resource_types).await {
                BulkOutcome::Success(bundle) => {
                    info!(records = bundle.total_records(), "批量接口获取成功");
                    observer.on_progress(100, "已通过批量接口获取全部数据");
                    return Ok((bundle, true));
                }
                BulkOutcome::Unavailable(reason) => {
                    warn!(%reason, "批量接口不可用，回退为逐资源获取");
                }
            }
        }

        let total = request.resource_types.len();
        let mut bundle = ExportBundle::new();
        for (index, resource) in request.resource_types.iter().enumerate() {
            let records = fetch_resource(&self.client, &self.endpoints, *resource).await?;
            let count = records.len();
            bundle.insert(*resource, records);

            let completed = index + 1;
            observer.on_progress(
                percent_complete(completed, total),
                &format!("已获取 {} ({} 条) [{}/{}]", resource, count, completed, total),
            );
        }

        Ok((bundle, false))
    }

    /// 执行导出（时间戳取当前本地时间）
    pub async fn execute(
        &self,
        request: &ExportRequest,
        observer: &dyn ExportProgressObserver,
    ) -> ExportResult<ExportOutcome> {
        let now = chrono::Local::now().naive_local();
        self.execute_at(request, observer, now).await
    }

    /// 执行导出（指定序列化时间戳）
    #[instrument(
        skip(self, request, observer),
        fields(
            export_id = %Uuid::new_v4(),
            format = %request.format,
            resources = request.resource_types.len()
        )
    )]
    pub async fn execute_at(
        &self,
        request: &ExportRequest,
        observer: &dyn ExportProgressObserver,
        at: NaiveDateTime,
    ) -> ExportResult<ExportOutcome> {
        info!("开始导出");

        let (bundle, used_bulk) = match self.fetch_bundle(request, observer).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "导出中止");
                return Err(e);
            }
        };

        let files = serialize_bundle(&bundle, request.format, at, self.row_limit)?;
        for file in &files {
            self.sink.save(file)?;
        }

        let filenames: Vec<String> = files.into_iter().map(|f| f.filename).collect();
        info!(files = filenames.len(), used_bulk, "导出完成");

        Ok(ExportOutcome {
            bundle,
            files: filenames,
            used_bulk,
        })
    }
}
