// ==========================================
// Repair Queens - 导出进度观察者
// ==========================================
// 职责: 逐资源抓取完成后上报 (百分比, 状态文本)
// 说明: 仅用于观察，不影响控制流
// ==========================================

use std::sync::Mutex;
use tracing::info;

/// 导出进度观察者 Trait
pub trait ExportProgressObserver: Send + Sync {
    /// 上报进度
    ///
    /// # 参数
    /// - `percent`: 已完成比例（0-100）
    /// - `message`: 状态文本
    fn on_progress(&self, percent: u8, message: &str);
}

/// 计算进度百分比（四舍五入）
pub fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = (completed.min(total) as f64 / total as f64) * 100.0;
    ratio.round() as u8
}

/// 空操作观察者
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressObserver;

impl ExportProgressObserver for NoOpProgressObserver {
    fn on_progress(&self, _percent: u8, _message: &str) {}
}

/// 写入日志的观察者（命令行使用）
#[derive(Debug, Clone, Default)]
pub struct TracingProgressObserver;

impl ExportProgressObserver for TracingProgressObserver {
    fn on_progress(&self, percent: u8, message: &str) {
        info!(percent, "{}", message);
    }
}

/// 记录所有进度事件的观察者（测试与界面回放使用）
#[derive(Debug, Default)]
pub struct RecordingProgressObserver {
    events: Mutex<Vec<(u8, String)>>,
}

impl RecordingProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(u8, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ExportProgressObserver for RecordingProgressObserver {
    fn on_progress(&self, percent: u8, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((percent, message.to_string()));
        }
    }
}
