use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Default)]
    pub enum UserRole {
        #[default]
        User => "user",
        Superuser => "superuser",
    }
}

string_enum! {
    #[derive(Default)]
    pub enum UserStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

fn default_true() -> bool {
    true
}

/// Stored account record. Never serialized to clients directly, see [`UserInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
    #[serde(default)]
    pub force_password_change: bool,
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        specialty: Option<String>,
        role: UserRole,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(&email),
            password_hash,
            specialty: specialty
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            role,
            status: UserStatus::Active,
            created_at: now,
            last_login: None,
            force_password_change: false,
            two_factor_enabled: false,
            notifications_enabled: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_superuser(&self) -> bool {
        self.role == UserRole::Superuser
    }
}

/// Emails are compared and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
    pub force_password_change: bool,
    pub two_factor_enabled: bool,
    pub notifications_enabled: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            specialty: user.specialty,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            last_login: user.last_login,
            force_password_change: user.force_password_change,
            two_factor_enabled: user.two_factor_enabled,
            notifications_enabled: user.notifications_enabled,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdateInput {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileUpdateInput {
    pub fn changes_password(&self) -> bool {
        self.new_password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettingsInput {
    pub notifications_enabled: bool,
}

/// Account created by a superuser. Role is always `user` and the password is generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserResponse {
    pub user: UserInfo,
    pub temporary_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetResponse {
    pub temporary_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdateInput {
    pub role: UserRole,
}
