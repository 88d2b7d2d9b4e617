// ==========================================
// Repair Queens - 客户端层
// ==========================================
// 职责: 后端 REST 调用的接口与实现
// ==========================================

pub mod api_client;
pub mod fixture;
pub mod transport;

pub use api_client::ApiClient;
pub use fixture::FixtureTransport;
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportError};
