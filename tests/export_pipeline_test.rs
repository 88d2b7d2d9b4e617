// ==========================================
// ExportPipeline 集成测试
// ==========================================
// 测试范围:
// 1. 批量接口命中 / 回退为逐资源抓取
// 2. 失败中止: 不落地任何文件
// 3. 进度上报与文件命名
// 4. ExportApi: 会话检查、单任务互斥
// ==========================================

mod helpers;

use chrono::{NaiveDate, NaiveDateTime};
use helpers::{client_for, GatedTransport, MockTransport, TEST_TOKEN};
use repair_queens::api::{ApiError, ExportApi};
use repair_queens::client::ApiClient;
use repair_queens::export::{
    DirectorySink, ExportEndpoints, ExportError, MemorySink, NoOpProgressObserver,
    RecordingProgressObserver,
};
use repair_queens::{ExportFormat, ExportPipeline, ExportRequest, ResourceType};
use serde_json::json;
use std::sync::Arc;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn pipeline(transport: &Arc<MockTransport>, sink: &Arc<MemorySink>) -> ExportPipeline {
    ExportPipeline::new(client_for(transport), ExportEndpoints::default(), sink.clone())
}

fn parts_body() -> serde_json::Value {
    json!({
        "success": true,
        "parts": [
            { "name": "Filtru ulei", "stockQuantity": 0, "price": 35 },
            { "name": "Bujie", "stockQuantity": 3, "price": 12.5 }
        ]
    })
}

// ==========================================
// 抓取策略
// ==========================================

#[tokio::test]
async fn test_单资源只发一次请求() {
    let transport = Arc::new(MockTransport::new().with_ok("/export/parts", parts_body()));
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Json);

    let outcome = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap();

    assert_eq!(transport.called_paths(), vec!["/export/parts".to_string()]);
    assert!(!outcome.used_bulk);
    assert_eq!(
        outcome.bundle.resource_types().collect::<Vec<_>>(),
        vec![ResourceType::Parts]
    );
    assert_eq!(outcome.files, vec!["parts_20261016_1430.json".to_string()]);
}

#[tokio::test]
async fn test_批量接口命中时不逐资源抓取() {
    let transport = Arc::new(MockTransport::new().with_ok(
        "/export/all",
        json!({
            "success": true,
            "data": {
                "parts": [{ "name": "Bujie" }],
                "suppliers": [{ "name": "AutoParts SRL" }, { "name": "Bosch" }],
                "orders": [{ "id": "o-1" }]
            }
        }),
    ));
    let sink = Arc::new(MemorySink::new());
    let observer = RecordingProgressObserver::new();
    let request = ExportRequest::new(
        [ResourceType::Parts, ResourceType::Suppliers],
        ExportFormat::Csv,
    );

    let outcome = pipeline(&transport, &sink)
        .execute_at(&request, &observer, at())
        .await
        .unwrap();

    assert_eq!(transport.called_paths(), vec!["/export/all".to_string()]);
    assert!(outcome.used_bulk);
    assert_eq!(outcome.bundle.len(), 2, "只保留请求的资源类型");
    assert_eq!(outcome.bundle.get(ResourceType::Suppliers).unwrap().len(), 2);
    assert!(outcome.bundle.get(ResourceType::Orders).is_none());
    assert_eq!(observer.events().last().map(|e| e.0), Some(100));

    let files = sink.files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "parts_20261016_1430.csv");
    assert_eq!(files[1].content, "name\n\"AutoParts SRL\"\n\"Bosch\"\n");
}

#[tokio::test]
async fn test_批量接口不可用时回退() {
    let transport = Arc::new(
        MockTransport::new()
            .with_status("/export/all", 404, json!({ "message": "Not found" }))
            .with_ok("/export/parts", parts_body())
            .with_ok("/export/orders", json!({ "success": true, "data": [] })),
    );
    let sink = Arc::new(MemorySink::new());
    let observer = RecordingProgressObserver::new();
    let request = ExportRequest::new([ResourceType::Orders, ResourceType::Parts], ExportFormat::Csv);

    let outcome = pipeline(&transport, &sink)
        .execute_at(&request, &observer, at())
        .await
        .unwrap();

    assert_eq!(
        transport.called_paths(),
        vec![
            "/export/all".to_string(),
            "/export/parts".to_string(),
            "/export/orders".to_string()
        ]
    );
    assert!(!outcome.used_bulk);

    let percents: Vec<u8> = observer.events().iter().map(|e| e.0).collect();
    assert_eq!(percents, vec![50, 100]);

    // 空资源不生成 CSV 文件
    assert_eq!(outcome.files, vec!["parts_20261016_1430.csv".to_string()]);
}

#[tokio::test]
async fn test_批量响应无data字段时回退() {
    let transport = Arc::new(
        MockTransport::new()
            .with_ok("/export/all", json!({ "success": true }))
            .with_ok("/export/parts", parts_body())
            .with_ok("/export/suppliers", json!([{ "name": "Bosch" }])),
    );
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new(
        [ResourceType::Parts, ResourceType::Suppliers],
        ExportFormat::Pdf,
    );

    let outcome = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap();

    assert_eq!(transport.calls().len(), 3);
    assert_eq!(outcome.files, vec!["parts-suppliers_20261016_1430.html".to_string()]);
    let html = &sink.files()[0].content;
    assert!(html.contains("<h2>Parts (2 records)</h2>"));
    assert!(html.contains("<h2>Suppliers (1 records)</h2>"));
}

// ==========================================
// 失败中止
// ==========================================

#[tokio::test]
async fn test_空选择不发请求() {
    let transport = Arc::new(MockTransport::new());
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new(Vec::<ResourceType>::new(), ExportFormat::Csv);

    let err = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap_err();

    assert_eq!(err, ExportError::NoSelection);
    assert!(transport.calls().is_empty());
    assert!(sink.files().is_empty());
}

#[tokio::test]
async fn test_单资源http失败中止整个导出() {
    let transport = Arc::new(
        MockTransport::new()
            .with_ok("/export/parts", parts_body())
            .with_status("/export/suppliers", 500, json!({ "message": "boom" })),
    );
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new(
        [ResourceType::Parts, ResourceType::Suppliers, ResourceType::Orders],
        ExportFormat::Json,
    );

    let err = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ExportError::FetchFailed {
            resource: ResourceType::Suppliers,
            status: Some(500),
            detail: "boom".to_string(),
        }
    );
    assert!(sink.files().is_empty(), "失败时不落地任何文件");
    assert!(!transport.called_paths().contains(&"/export/orders".to_string()));
}

#[tokio::test]
async fn test_业务失败返回logical_failure() {
    let transport = Arc::new(MockTransport::new().with_ok(
        "/export/orders",
        json!({ "success": false, "message": "Acces interzis" }),
    ));
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new([ResourceType::Orders], ExportFormat::Csv);

    let err = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ExportError::LogicalFailure {
            resource: ResourceType::Orders,
            message: "Acces interzis".to_string(),
        }
    );
}

#[tokio::test]
async fn test_网络错误没有状态码() {
    let transport = Arc::new(MockTransport::new().with_network_error("/export/parts"));
    let sink = Arc::new(MemorySink::new());
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Csv);

    let err = pipeline(&transport, &sink)
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExportError::FetchFailed { status: None, .. }
    ));
}

// ==========================================
// 落地
// ==========================================

#[tokio::test]
async fn test_写入目录() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exports");
    let transport = Arc::new(MockTransport::new().with_ok("/export/parts", parts_body()));
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Csv);

    let pipeline = ExportPipeline::new(
        client_for(&transport),
        ExportEndpoints::default(),
        Arc::new(DirectorySink::new(&out)),
    );
    pipeline
        .execute_at(&request, &NoOpProgressObserver, at())
        .await
        .unwrap();

    let content = std::fs::read_to_string(out.join("parts_20261016_1430.csv")).unwrap();
    assert_eq!(
        content,
        "name,stockQuantity,price\n\"Filtru ulei\",0,35\n\"Bujie\",3,12.5\n"
    );
}

// ==========================================
// ExportApi
// ==========================================

#[tokio::test]
async fn test_export_api_无令牌() {
    let transport = Arc::new(MockTransport::new());
    let pipeline = ExportPipeline::new(
        ApiClient::new(transport.clone(), None),
        ExportEndpoints::default(),
        Arc::new(MemorySink::new()),
    );
    let api = ExportApi::new(pipeline);
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Csv);

    let err = api.export(&request, &NoOpProgressObserver).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_export_api_空选择优先报错() {
    let transport = Arc::new(MockTransport::new());
    let api = ExportApi::new(pipeline(&transport, &Arc::new(MemorySink::new())));

    let request = ExportRequest::new(Vec::<ResourceType>::new(), ExportFormat::Csv);

    let err = api.export(&request, &NoOpProgressObserver).await.unwrap_err();

    assert!(matches!(err, ApiError::Export(ExportError::NoSelection)));
    assert_eq!(err.user_message(), "请至少选择一种导出数据类型");
}

#[tokio::test]
async fn test_export_api_完成后可再次导出() {
    let transport = Arc::new(MockTransport::new().with_ok("/export/parts", parts_body()));
    let sink = Arc::new(MemorySink::new());
    let api = ExportApi::new(pipeline(&transport, &sink));
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Json);

    api.export(&request, &NoOpProgressObserver).await.unwrap();
    assert!(!api.is_exporting());
    api.export(&request, &NoOpProgressObserver).await.unwrap();

    assert_eq!(sink.files().len(), 2);
}

#[tokio::test]
async fn test_export_api_失败后释放运行标志() {
    let transport = Arc::new(MockTransport::new());
    let api = ExportApi::new(pipeline(&transport, &Arc::new(MemorySink::new())));
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Json);

    let err = api.export(&request, &NoOpProgressObserver).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Export(ExportError::FetchFailed { status: Some(404), .. })
    ));
    assert!(!api.is_exporting());
}

#[tokio::test]
async fn test_export_api_进行中拒绝第二个导出() {
    let transport = Arc::new(GatedTransport::new(parts_body()));
    let sink = Arc::new(MemorySink::new());
    let api = ExportApi::new(ExportPipeline::new(
        ApiClient::new(transport.clone(), Some(TEST_TOKEN.to_string())),
        ExportEndpoints::default(),
        sink.clone(),
    ));
    let request = ExportRequest::new([ResourceType::Parts], ExportFormat::Json);

    // 第一个导出推进到传输层后挂起
    let first = api.export(&request, &NoOpProgressObserver);
    tokio::pin!(first);
    tokio::select! {
        _ = &mut first => panic!("闸门未放行前导出不应完成"),
        _ = transport.entered.notified() => {}
    }
    assert!(api.is_exporting());

    let err = api.export(&request, &NoOpProgressObserver).await.unwrap_err();
    assert!(matches!(err, ApiError::ExportInProgress));
    assert_eq!(transport.call_count(), 1);

    transport.release.notify_one();
    first.await.unwrap();
    assert!(!api.is_exporting());
    assert_eq!(sink.files().len(), 1);

    // 预先放行，再次导出可以正常完成
    transport.release.notify_one();
    api.export(&request, &NoOpProgressObserver).await.unwrap();
    assert_eq!(transport.call_count(), 2);
    assert_eq!(sink.files().len(), 2);
}
