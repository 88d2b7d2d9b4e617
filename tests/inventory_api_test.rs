// ==========================================
// InventoryApi 集成测试
// ==========================================
// 测试范围:
// 1. 低库存加载: 响应解包、会话检查
// 2. 库存调整: 本地校验、PUT 请求、看板同步
// 3. AppState: 从本地库组装
// ==========================================

mod helpers;

use helpers::{client_for, part, MockTransport, TEST_TOKEN};
use repair_queens::api::{ApiError, InventoryApi};
use repair_queens::app::AppState;
use repair_queens::client::{ApiClient, HttpMethod};
use repair_queens::config::{AppConfig, ConfigManager, SessionStore};
use repair_queens::db::open_in_memory;
use repair_queens::export::MemorySink;
use repair_queens::{LowStockBoard, SessionUser, StockAdjustment, StockOperation, UserRole};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn api(transport: &Arc<MockTransport>) -> InventoryApi {
    InventoryApi::new(client_for(transport), &AppConfig::default())
}

// ==========================================
// 低库存加载
// ==========================================

#[tokio::test]
async fn test_load_low_stock_解包parts字段() {
    let transport = Arc::new(MockTransport::new().with_ok(
        "/parts/low-stock",
        json!({
            "success": true,
            "parts": [
                { "_id": "p1", "name": "Filtru ulei", "category": "Filtre",
                  "stockQuantity": 0, "minimumStockLevel": 10, "price": 35,
                  "supplier": { "_id": "s1", "name": "Bosch" } },
                { "_id": "p2", "name": "Bujie", "stockQuantity": 2, "minimumStockLevel": 8, "price": 12.5,
                  "supplier": "AutoParts SRL" }
            ]
        }),
    ));

    let board = api(&transport).load_low_stock().await.unwrap();

    assert_eq!(board.parts().len(), 2);
    assert_eq!(board.parts()[0].supplier_name(), Some("Bosch"));
    assert_eq!(board.parts()[1].supplier_name(), Some("AutoParts SRL"));
    assert_eq!(board.summary().critical_count, 1);

    let calls = transport.calls();
    assert_eq!(calls[0].method, HttpMethod::Get);
    assert_eq!(calls[0].bearer.as_deref(), Some(TEST_TOKEN));
}

#[tokio::test]
async fn test_load_low_stock_无令牌不发请求() {
    let transport = Arc::new(MockTransport::new());
    let api = InventoryApi::new(
        ApiClient::new(transport.clone(), None),
        &AppConfig::default(),
    );

    let err = api.load_low_stock().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_load_low_stock_后端错误() {
    let transport = Arc::new(MockTransport::new().with_status(
        "/parts/low-stock",
        401,
        json!({ "success": false, "message": "Token invalid" }),
    ));

    let err = api(&transport).load_low_stock().await.unwrap_err();

    assert!(matches!(err, ApiError::Backend { status: 401, .. }));
}

// ==========================================
// 库存调整
// ==========================================

fn board() -> LowStockBoard {
    LowStockBoard::new(vec![part("p1", "Filtru ulei", 2, 10, 35.0)])
}

#[tokio::test]
async fn test_adjust_stock_成功后同步看板() {
    let transport = Arc::new(MockTransport::new().with_ok(
        "/parts/p1/stock",
        json!({ "success": true, "part": { "_id": "p1", "stockQuantity": 12 } }),
    ));
    let mut board = board();
    let adjustment = StockAdjustment::new(10, StockOperation::Add, "Receptie marfa");

    let new_stock = api(&transport)
        .adjust_stock(&mut board, "p1", &adjustment)
        .await
        .unwrap();

    assert_eq!(new_stock, 12);
    assert_eq!(board.parts()[0].stock_quantity, 12);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, HttpMethod::Put);
    assert_eq!(
        calls[0].body,
        Some(json!({ "quantity": 10, "operation": "add", "reason": "Receptie marfa" }))
    );
}

#[tokio::test]
async fn test_adjust_stock_无返回值时使用本地预览() {
    let transport = Arc::new(MockTransport::new().with_ok("/parts/p1/stock", json!({ "success": true })));
    let mut board = board();
    let adjustment = StockAdjustment::new(7, StockOperation::Set, "Inventar");

    let new_stock = api(&transport)
        .adjust_stock(&mut board, "p1", &adjustment)
        .await
        .unwrap();

    assert_eq!(new_stock, 7);
    assert_eq!(board.parts()[0].stock_quantity, 7);
}

#[tokio::test]
async fn test_adjust_stock_扣减超过库存不发请求() {
    let transport = Arc::new(MockTransport::new());
    let mut board = board();
    let adjustment = StockAdjustment::new(5, StockOperation::Subtract, "Montaj");

    let err = api(&transport)
        .adjust_stock(&mut board, "p1", &adjustment)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(transport.calls().is_empty());
    assert_eq!(board.parts()[0].stock_quantity, 2);
}

#[tokio::test]
async fn test_adjust_stock_参数校验() {
    let transport = Arc::new(MockTransport::new());
    let mut board = board();

    let zero = StockAdjustment::new(0, StockOperation::Add, "x");
    let err = api(&transport).adjust_stock(&mut board, "p1", &zero).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let no_reason = StockAdjustment::new(1, StockOperation::Add, "  ");
    let err = api(&transport).adjust_stock(&mut board, "p1", &no_reason).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let ok = StockAdjustment::new(1, StockOperation::Add, "x");
    let err = api(&transport).adjust_stock(&mut board, "missing", &ok).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_adjust_stock_业务失败() {
    let transport = Arc::new(MockTransport::new().with_ok(
        "/parts/p1/stock",
        json!({ "success": false, "message": "Stoc insuficient" }),
    ));
    let mut board = board();
    let adjustment = StockAdjustment::new(1, StockOperation::Subtract, "Montaj");

    let err = api(&transport)
        .adjust_stock(&mut board, "p1", &adjustment)
        .await
        .unwrap_err();

    match err {
        ApiError::BusinessRuleViolation(message) => assert_eq!(message, "Stoc insuficient"),
        other => panic!("意外的错误: {:?}", other),
    }
    assert_eq!(board.parts()[0].stock_quantity, 2, "失败时看板不变");
}

// ==========================================
// AppState
// ==========================================

#[tokio::test]
async fn test_app_state_使用本地会话与配置() {
    let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
    let user = SessionUser {
        id: "u1".to_string(),
        name: "Ana".to_string(),
        email: None,
        role: UserRole::Manager,
    };
    SessionStore::from_connection(conn.clone())
        .save_session(TEST_TOKEN, &user)
        .unwrap();
    ConfigManager::from_connection(conn.clone())
        .set_config_value("low_stock_path", "/inventory/low")
        .unwrap();

    let transport = Arc::new(MockTransport::new().with_ok("/inventory/low", json!([])));
    let conn = Arc::try_unwrap(conn).ok().unwrap().into_inner().unwrap();
    let state = AppState::from_connection(
        conn,
        ":memory:".to_string(),
        transport.clone(),
        Arc::new(MemorySink::new()),
    )
    .unwrap();

    let board = state.inventory_api.load_low_stock().await.unwrap();

    assert!(board.parts().is_empty());
    assert_eq!(transport.called_paths(), vec!["/inventory/low".to_string()]);
    assert_eq!(transport.calls()[0].bearer.as_deref(), Some(TEST_TOKEN));
}
