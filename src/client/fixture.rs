// ==========================================
// Repair Queens - 本地镜像传输实现
// ==========================================
// 职责: 以目录中的 JSON 文件充当只读后端
// 映射: GET /export/parts → <root>/export/parts.json
// ==========================================

use crate::client::transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FixtureTransport {
    root: PathBuf,
}

impl FixtureTransport {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// 请求路径 → 镜像文件路径（忽略查询串，拒绝 `..`）
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let clean = path.split('?').next().unwrap_or("").trim_matches('/');
        if clean.is_empty() || clean.split('/').any(|seg| seg == ".." || seg.is_empty()) {
            return None;
        }
        Some(self.root.join(format!("{}.json", clean)))
    }
}

#[async_trait]
impl ApiTransport for FixtureTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if request.method != HttpMethod::Get {
            return Ok(ApiResponse::new(
                405,
                json!({ "success": false, "message": "本地镜像为只读" }),
            ));
        }

        let file = match self.resolve(&request.path) {
            Some(file) => file,
            None => {
                return Ok(ApiResponse::new(
                    400,
                    json!({ "success": false, "message": format!("非法路径: {}", request.path) }),
                ))
            }
        };

        debug!(path = %request.path, file = %file.display(), "读取镜像文件");

        let raw = match tokio::fs::read_to_string(&file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(ApiResponse::new(
                    404,
                    json!({ "success": false, "message": format!("未找到: {}", request.path) }),
                ))
            }
            Err(e) => return Err(TransportError::Network(e.to_string())),
        };

        let body: Value =
            serde_json::from_str(&raw).map_err(|e| TransportError::InvalidBody(e.to_string()))?;
        Ok(ApiResponse::ok(body))
    }
}
