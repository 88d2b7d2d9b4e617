// ==========================================
// Repair Queens - 文件下载落地
// ==========================================
// 职责: 接收 (内容, 文件名, MIME) 并保存
// 实现: DirectorySink（写入目录）、MemorySink（内存收集）
// ==========================================

use crate::export::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// 一个待下载的导出文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

/// 文件下载落地 Trait
pub trait DownloadSink: Send + Sync {
    fn save(&self, file: &ExportFile) -> ExportResult<()>;
}

// ==========================================
// DirectorySink - 写入本地目录
// ==========================================
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file: &ExportFile) -> ExportResult<()> {
        let sink_err = |e: std::io::Error| ExportError::Sink {
            filename: file.filename.clone(),
            message: e.to_string(),
        };

        std::fs::create_dir_all(&self.dir).map_err(sink_err)?;
        let path = self.dir.join(&file.filename);
        std::fs::write(&path, file.content.as_bytes()).map_err(sink_err)?;

        info!(path = %path.display(), mime = %file.mime_type, "导出文件已保存");
        Ok(())
    }
}

// ==========================================
// MemorySink - 内存收集
// ==========================================
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<ExportFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<ExportFile> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save(&self, file: &ExportFile) -> ExportResult<()> {
        let mut files = self.files.lock().map_err(|e| ExportError::Sink {
            filename: file.filename.clone(),
            message: format!("锁获取失败: {}", e),
        })?;
        files.push(file.clone());
        Ok(())
    }
}
