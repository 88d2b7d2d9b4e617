// ==========================================
// Repair Queens - 后端传输层接口
// ==========================================
// 职责: 定义带凭证的 REST 调用接口（不包含实现）
// 说明: 超时等传输策略属于实现方，本层不做约束
// ==========================================

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// HTTP 方法（本系统只用到 GET / PUT）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Put => write!(f, "PUT"),
        }
    }
}

/// 一次 REST 调用
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// 相对路径（如 /export/parts）
    pub path: String,
    /// Bearer 凭证
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            bearer: None,
            body: None,
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            bearer: None,
            body: Some(body),
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// 后端响应: HTTP 状态码 + JSON 响应体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// 传输层成功（2xx）
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 业务层成功: 响应体 `success` 字段; 缺省视为成功（如直接返回数组）
    pub fn is_logical_success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// 响应体中的 `message` 字段
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// 传输层错误（未拿到可用响应）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("网络请求失败: {0}")]
    Network(String),

    #[error("响应解析失败: {0}")]
    InvalidBody(String),
}

// ==========================================
// ApiTransport Trait
// ==========================================
// 实现者: FixtureTransport（本地镜像）、测试中的 Mock
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// 发送一次请求
    ///
    /// # 返回
    /// - Ok(ApiResponse): 拿到响应（无论状态码）
    /// - Err(TransportError): 连接/读取失败
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
