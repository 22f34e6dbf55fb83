use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    pub email: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub timestamp: NaiveDateTime,
}
