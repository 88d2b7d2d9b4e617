// ==========================================
// Repair Queens - 本地会话存储
// ==========================================
// 职责: 保存/读取登录凭证与当前用户（浏览器 localStorage 的等价物）
// 红线: 只消费后端签发的凭证，不负责签发与校验
// 存储: session_kv 表
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::session::SessionUser;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

pub struct SessionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SessionStore {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;
        Ok(conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    /// 登录成功后保存会话
    pub fn save_session(&self, token: &str, user: &SessionUser) -> ConfigResult<()> {
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: TOKEN_KEY.to_string(),
                message: "凭证不能为空".to_string(),
            });
        }

        let user_json = serde_json::to_string(user)?;
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;

        let tx = conn.transaction()?;
        for (key, value) in [(TOKEN_KEY, token), (USER_KEY, user_json.as_str())] {
            tx.execute(
                "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()?;

        tracing::info!(user_id = %user.id, role = %user.role, "会话已保存");
        Ok(())
    }

    pub fn current_token(&self) -> ConfigResult<Option<String>> {
        Ok(self.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }

    pub fn current_user(&self) -> ConfigResult<Option<SessionUser>> {
        match self.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// 退出登录
    pub fn clear(&self) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))?;
        conn.execute("DELETE FROM session_kv", [])?;
        Ok(())
    }
}
