// ==========================================
// Repair Queens - 会话用户
// ==========================================
// 登录后由后端签发，本地仅保存与读取（不负责签发）
// ==========================================

use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: UserRole,
}
