use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    pub enum AuditAction {
        Login => "LOGIN",
        Register => "REGISTER",
        EnableUser => "ENABLE_USER",
        DisableUser => "DISABLE_USER",
        ResetPassword => "RESET_PASSWORD",
        CreateUser => "CREATE_USER",
        ChangeRole => "CHANGE_ROLE",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub action: AuditAction,
    #[serde(default)]
    pub target_user_id: Option<Uuid>,
    #[serde(default)]
    pub target_email: Option<String>,
    pub details: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// Where a request came from, recorded with audit entries and login attempts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
