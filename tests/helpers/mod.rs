// ==========================================
// 集成测试辅助
// ==========================================
// MockTransport: 按路径返回预设响应，并记录所有请求
// GatedTransport: 请求进入后挂起，直到测试放行
// part(): 配件构造器
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use repair_queens::client::{ApiClient, ApiRequest, ApiResponse, ApiTransport, TransportError};
use repair_queens::Part;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const TEST_TOKEN: &str = "test-token";

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, Result<ApiResponse, TransportError>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设 200 响应
    pub fn with_ok(self, path: &str, body: Value) -> Self {
        self.with_response(path, ApiResponse::ok(body))
    }

    pub fn with_status(self, path: &str, status: u16, body: Value) -> Self {
        self.with_response(path, ApiResponse::new(status, body))
    }

    pub fn with_response(self, path: &str, response: ApiResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(response));
        self
    }

    pub fn with_network_error(self, path: &str) -> Self {
        self.responses.lock().unwrap().insert(
            path.to_string(),
            Err(TransportError::Network("connection refused".to_string())),
        );
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path.clone();
        self.calls.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or_else(|| {
                Ok(ApiResponse::new(
                    404,
                    json!({ "success": false, "message": "Not found" }),
                ))
            })
    }
}

/// 闸门传输: 每个请求先通知 entered，再等待 release 放行后返回固定响应
pub struct GatedTransport {
    pub entered: Notify,
    pub release: Notify,
    body: Value,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn new(body: Value) -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
            body,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiTransport for GatedTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ApiResponse::ok(self.body.clone()))
    }
}

/// 带令牌的客户端
pub fn client_for(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(transport.clone(), Some(TEST_TOKEN.to_string()))
}

/// 配件构造器
pub fn part(id: &str, name: &str, stock: u32, min: u32, price: f64) -> Part {
    Part {
        id: id.to_string(),
        name: name.to_string(),
        category: String::new(),
        stock_quantity: stock,
        minimum_stock_level: min,
        price,
        part_number: None,
        supplier: None,
    }
}

pub fn part_in(id: &str, name: &str, category: &str, stock: u32, min: u32, price: f64) -> Part {
    Part {
        category: category.to_string(),
        ..part(id, name, stock, min, price)
    }
}
