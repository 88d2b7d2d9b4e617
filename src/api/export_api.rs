// ==========================================
// Repair Queens - 导出 API
// ==========================================
// 职责: 导出入口，负责会话检查与单任务互斥
// 红线: 同一时刻只允许一个导出任务
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::export::ExportRequest;
use crate::export::{ExportError, ExportOutcome, ExportPipeline, ExportProgressObserver};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

pub struct ExportApi {
    pipeline: ExportPipeline,
    running: AtomicBool,
}

/// 运行标志守卫，离开作用域即释放
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ExportApi {
    pub fn new(pipeline: ExportPipeline) -> Self {
        Self {
            pipeline,
            running: AtomicBool::new(false),
        }
    }

    /// 当前是否有导出任务进行中
    pub fn is_exporting(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 执行导出
    ///
    /// # 错误
    /// - Export(NoSelection): 未选择资源（不发起任何请求）
    /// - Unauthenticated: 无会话令牌
    /// - ExportInProgress: 已有任务在执行
    /// - Export(..): 抓取/序列化/落地失败
    pub async fn export(
        &self,
        request: &ExportRequest,
        observer: &dyn ExportProgressObserver,
    ) -> ApiResult<ExportOutcome> {
        if request.is_empty() {
            return Err(ApiError::Export(ExportError::NoSelection));
        }
        if !self.pipeline.has_credential() {
            return Err(ApiError::Unauthenticated);
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("导出请求被拒绝: 已有任务进行中");
            return Err(ApiError::ExportInProgress);
        }
        let _guard = RunningGuard(&self.running);

        let outcome = self.pipeline.execute(request, observer).await?;
        info!(files = outcome.files.len(), "导出请求完成");
        Ok(outcome)
    }
}
