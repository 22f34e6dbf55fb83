use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{UserRole, UserStatus};

/// Event payload of a notification; the `type` tag travels next to the
/// common fields of [`Notification`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NotificationKind {
    NewUser {
        user_id: Uuid,
        user_email: String,
    },
    UserStatusChange {
        user_id: Uuid,
        user_email: String,
        status: UserStatus,
    },
    PasswordReset {
        user_id: Uuid,
        user_email: String,
    },
    RoleChange {
        user_id: Uuid,
        user_email: String,
        role: UserRole,
    },
    SystemAlert {
        message: String,
    },
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::NewUser { .. } => "Novo usuário",
            NotificationKind::UserStatusChange { .. } => "Status de usuário alterado",
            NotificationKind::PasswordReset { .. } => "Senha redefinida",
            NotificationKind::RoleChange { .. } => "Perfil de acesso alterado",
            NotificationKind::SystemAlert { .. } => "Alerta do sistema",
        }
    }

    pub fn message(&self) -> String {
        match self {
            NotificationKind::NewUser { user_email, .. } => {
                format!("{} criou uma conta", user_email)
            }
            NotificationKind::UserStatusChange {
                user_email, status, ..
            } => match status {
                UserStatus::Active => format!("{} foi ativado", user_email),
                UserStatus::Inactive => format!("{} foi desativado", user_email),
            },
            NotificationKind::PasswordReset { user_email, .. } => {
                format!("A senha de {} foi redefinida", user_email)
            }
            NotificationKind::RoleChange {
                user_email, role, ..
            } => format!("{} agora tem o perfil {}", user_email, role),
            NotificationKind::SystemAlert { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl Notification {
    pub fn new(kind: NotificationKind, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: kind.title().to_string(),
            message: kind.message(),
            kind,
            read: false,
            created_at: now,
        }
    }
}
