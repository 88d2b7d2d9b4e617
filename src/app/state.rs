// ==========================================
// Repair Queens - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ApiResult, ExportApi, InventoryApi};
use crate::client::{ApiClient, ApiTransport};
use crate::config::{AppConfig, ConfigError, ConfigManager, SessionStore};
use crate::db::open_sqlite_connection;
use crate::export::{DirectorySink, DownloadSink, ExportPipeline};

/// 应用状态
///
/// 会话令牌在构建时读取；登录/登出后需重新构建
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 强类型配置快照
    pub app_config: AppConfig,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 本地会话
    pub session_store: Arc<SessionStore>,

    /// 库存API
    pub inventory_api: Arc<InventoryApi>,

    /// 导出API
    pub export_api: Arc<ExportApi>,
}

impl AppState {
    /// 创建新的AppState实例，导出文件写入配置的输出目录
    pub fn new(db_path: String, transport: Arc<dyn ApiTransport>) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(ConfigError::from)?;
        let config_manager = ConfigManager::from_connection(Arc::new(Mutex::new(conn)));
        let export_dir = config_manager.load_app_config()?.export_output_dir;

        Self::with_sink(
            config_manager,
            db_path,
            transport,
            Arc::new(DirectorySink::new(export_dir)),
        )
    }

    /// 使用已打开的连接与自定义下载落地构建（测试/嵌入场景）
    pub fn from_connection(
        conn: Connection,
        db_path: String,
        transport: Arc<dyn ApiTransport>,
        sink: Arc<dyn DownloadSink>,
    ) -> ApiResult<Self> {
        let config_manager = ConfigManager::from_connection(Arc::new(Mutex::new(conn)));
        Self::with_sink(config_manager, db_path, transport, sink)
    }

    fn with_sink(
        config_manager: ConfigManager,
        db_path: String,
        transport: Arc<dyn ApiTransport>,
        sink: Arc<dyn DownloadSink>,
    ) -> ApiResult<Self> {
        let session_store = SessionStore::from_connection(config_manager.connection());
        let app_config = config_manager.load_app_config()?;
        let token = session_store.current_token()?;
        if token.is_none() {
            tracing::warn!("本地无会话令牌，需要登录后才能访问后端");
        }

        let client = ApiClient::new(transport, token);
        let inventory_api = InventoryApi::new(client.clone(), &app_config);
        let pipeline = ExportPipeline::new(client, app_config.export_endpoints(), sink)
            .with_row_limit(app_config.pdf_row_limit);

        Ok(Self {
            db_path,
            app_config,
            config_manager: Arc::new(config_manager),
            session_store: Arc::new(session_store),
            inventory_api: Arc::new(inventory_api),
            export_api: Arc::new(ExportApi::new(pipeline)),
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 REPAIR_QUEENS_DB_PATH（非空时）
/// - 否则: 用户数据目录/repair-queens/repair_queens.db
/// - 无法获取数据目录时: ./repair_queens.db
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("REPAIR_QUEENS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./repair_queens.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("repair-queens");
        // 目录创建失败时由后续打开数据库报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("repair_queens.db");
    }

    path.to_string_lossy().to_string()
}
