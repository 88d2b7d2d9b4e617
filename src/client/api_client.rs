// ==========================================
// Repair Queens - 带凭证的 API 客户端
// ==========================================
// 职责: 为每次调用附加 Bearer 凭证，委托给 ApiTransport
// 说明: 凭证只消费不签发（来自本地会话存储）
// ==========================================

use crate::client::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>, token: Option<String>) -> Self {
        Self { transport, token }
    }

    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match &self.token {
            Some(token) => request.with_bearer(token.clone()),
            None => request,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        debug!(path, "GET");
        self.transport
            .send(self.authorize(ApiRequest::get(path)))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, TransportError> {
        debug!(path, "PUT");
        self.transport
            .send(self.authorize(ApiRequest::put(path, body)))
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("has_credential", &self.token.is_some())
            .finish()
    }
}
