// ==========================================
// Repair Queens - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::export::fetch::ExportEndpoints;
use crate::export::serializer::DEFAULT_PDF_ROW_LIMIT;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导出接口
    pub const BULK_EXPORT_PATH: &str = "bulk_export_path";
    pub const RESOURCE_EXPORT_PATH: &str = "resource_export_path";

    // 库存接口
    pub const LOW_STOCK_PATH: &str = "low_stock_path";
    pub const STOCK_UPDATE_PATH: &str = "stock_update_path"; // 含 {id} 占位符

    // 导出输出
    pub const EXPORT_OUTPUT_DIR: &str = "export_output_dir";
    pub const PDF_ROW_LIMIT: &str = "pdf_row_limit";
}

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// AppConfig - 配置快照（强类型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub bulk_export_path: String,
    pub resource_export_path: String,
    pub low_stock_path: String,
    pub stock_update_path: String,
    pub export_output_dir: PathBuf,
    pub pdf_row_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let endpoints = ExportEndpoints::default();
        Self {
            bulk_export_path: endpoints.bulk_path,
            resource_export_path: endpoints.resource_path_template,
            low_stock_path: "/parts/low-stock".to_string(),
            stock_update_path: "/parts/{id}/stock".to_string(),
            export_output_dir: default_export_dir(),
            pdf_row_limit: DEFAULT_PDF_ROW_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn export_endpoints(&self) -> ExportEndpoints {
        ExportEndpoints {
            bulk_path: self.bulk_export_path.clone(),
            resource_path_template: self.resource_export_path.clone(),
        }
    }

    /// 库存调整接口路径
    pub fn stock_update_path_for(&self, part_id: &str) -> String {
        self.stock_update_path.replace("{id}", part_id)
    }
}

/// 默认导出目录: <用户数据目录>/repair-queens/exports
pub fn default_export_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("repair-queens").join("exports"))
        .unwrap_or_else(|| PathBuf::from("./exports"))
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager（连接需已建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享连接（会话存储与配置共用一个库）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 加载强类型配置（缺失项使用默认值）
    pub fn load_app_config(&self) -> ConfigResult<AppConfig> {
        let defaults = AppConfig::default();

        let export_output_dir = self
            .get_config_value(config_keys::EXPORT_OUTPUT_DIR)?
            .map(PathBuf::from)
            .unwrap_or(defaults.export_output_dir);

        let raw_limit = self.get_config_or_default(
            config_keys::PDF_ROW_LIMIT,
            &defaults.pdf_row_limit.to_string(),
        )?;
        let pdf_row_limit = match raw_limit.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => limit,
            _ => {
                tracing::warn!(
                    config_key = config_keys::PDF_ROW_LIMIT,
                    raw_value = %raw_limit,
                    "行数上限配置格式错误，使用默认值"
                );
                defaults.pdf_row_limit
            }
        };

        Ok(AppConfig {
            bulk_export_path: self
                .get_config_or_default(config_keys::BULK_EXPORT_PATH, &defaults.bulk_export_path)?,
            resource_export_path: self.get_config_or_default(
                config_keys::RESOURCE_EXPORT_PATH,
                &defaults.resource_export_path,
            )?,
            low_stock_path: self
                .get_config_or_default(config_keys::LOW_STOCK_PATH, &defaults.low_stock_path)?,
            stock_update_path: self.get_config_or_default(
                config_keys::STOCK_UPDATE_PATH,
                &defaults.stock_update_path,
            )?,
            export_output_dir,
            pdf_row_limit,
        })
    }
}
