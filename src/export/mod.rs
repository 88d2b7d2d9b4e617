// ==========================================
// Repair Queens - 导出层
// ==========================================
// 职责: 多资源抓取 → 合并 → CSV/JSON/HTML 序列化 → 下载落地
// ==========================================

pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod progress;
pub mod serializer;
pub mod sink;

pub use error::{ExportError, ExportResult};
pub use fetch::{BulkOutcome, ExportEndpoints};
pub use pipeline::{ExportOutcome, ExportPipeline};
pub use progress::{
    ExportProgressObserver, NoOpProgressObserver, RecordingProgressObserver,
    TracingProgressObserver,
};
pub use sink::{DirectorySink, DownloadSink, ExportFile, MemorySink};
