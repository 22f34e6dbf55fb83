use bcrypt::hash;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::config::Config;
use crate::database::{
    models::{
        AuditAction, AuditLog, ClientInfo, CreateUserInput, CreatedUserResponse, NotificationKind,
        PasswordResetResponse, User, UserInfo, UserRole, UserStatus,
    },
    repositories::{AuditLogRepository, NotificationRepository, UserRepository},
    store::Storage,
};
use crate::error::AppError;
use crate::services::{
    audit_logger::AuditLogger,
    auth::generate_temporary_password,
    notifications::NotificationService,
    validation::{ValidationErrors, is_valid_email},
};

/// Account management for superusers. Callers are expected to have checked
/// the actor's role already.
#[derive(Clone)]
pub struct AdminService {
    users: UserRepository,
    audit: AuditLogger,
    notifications: NotificationService,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(storage: &Storage, config: &Config) -> Self {
        Self {
            users: UserRepository::new(storage.clone()),
            audit: AuditLogger::new(AuditLogRepository::new(
                storage.clone(),
                config.max_audit_logs,
            )),
            notifications: NotificationService::new(NotificationRepository::new(
                storage.clone(),
                config.max_notifications,
            )),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    async fn target(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", &id.to_string()))
    }

    pub async fn get_all_users(&self) -> Result<Vec<UserInfo>, AppError> {
        Ok(self
            .users
            .get_all()
            .await?
            .into_iter()
            .map(UserInfo::from)
            .collect())
    }

    pub async fn create_user(
        &self,
        actor: &User,
        input: CreateUserInput,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<CreatedUserResponse, AppError> {
        let mut errors = ValidationErrors::new();
        if input.name.trim().chars().count() < 2 {
            errors.add("name", "Nome deve ter pelo menos 2 caracteres");
        }
        if !is_valid_email(&input.email) {
            errors.add("email", "Email inválido");
        }
        errors.into_result()?;

        let temporary_password = generate_temporary_password();
        let mut user = User::new(
            input.name,
            input.email,
            hash(&temporary_password, self.bcrypt_cost)?,
            input.specialty,
            UserRole::User,
            now,
        );
        user.force_password_change = true;

        let user = self
            .users
            .create(user)
            .await?
            .ok_or_else(|| AppError::Conflict("Email already in use".to_string()))?;
        log::info!("User {} created by {}", user.email, actor.email);

        self.audit
            .log(
                actor,
                AuditAction::CreateUser,
                Some(&user),
                format!("Created user {}", user.email),
                client,
                now,
            )
            .await;

        Ok(CreatedUserResponse {
            user: user.into(),
            temporary_password,
        })
    }

    pub async fn toggle_user_status(
        &self,
        actor: &User,
        id: Uuid,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<UserInfo, AppError> {
        let target = self.target(id).await?;
        let status = if target.is_active() {
            UserStatus::Inactive
        } else {
            UserStatus::Active
        };
        if actor.id == id && status == UserStatus::Inactive {
            return Err(AppError::Forbidden(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let updated = self
            .users
            .update(id, |u| u.status = status)
            .await?
            .ok_or_else(|| AppError::not_found("User", &id.to_string()))?;

        let action = match status {
            UserStatus::Active => AuditAction::EnableUser,
            UserStatus::Inactive => AuditAction::DisableUser,
        };
        self.audit
            .log(
                actor,
                action,
                Some(&updated),
                format!("Status changed to {}", status),
                client,
                now,
            )
            .await;
        self.notifications
            .notify(
                NotificationKind::UserStatusChange {
                    user_id: updated.id,
                    user_email: updated.email.clone(),
                    status,
                },
                now,
            )
            .await;

        Ok(updated.into())
    }

    pub async fn reset_password(
        &self,
        actor: &User,
        id: Uuid,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<PasswordResetResponse, AppError> {
        self.target(id).await?;

        let temporary_password = generate_temporary_password();
        let password_hash = hash(&temporary_password, self.bcrypt_cost)?;
        let updated = self
            .users
            .update(id, |u| {
                u.password_hash = password_hash;
                u.force_password_change = true;
            })
            .await?
            .ok_or_else(|| AppError::not_found("User", &id.to_string()))?;

        self.audit
            .log(
                actor,
                AuditAction::ResetPassword,
                Some(&updated),
                "Password reset to a temporary password",
                client,
                now,
            )
            .await;
        self.notifications
            .notify(
                NotificationKind::PasswordReset {
                    user_id: updated.id,
                    user_email: updated.email.clone(),
                },
                now,
            )
            .await;

        Ok(PasswordResetResponse { temporary_password })
    }

    pub async fn update_role(
        &self,
        actor: &User,
        id: Uuid,
        role: UserRole,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<UserInfo, AppError> {
        let target = self.target(id).await?;
        if actor.id == id && role != UserRole::Superuser {
            return Err(AppError::Forbidden(
                "You cannot remove your own superuser role".to_string(),
            ));
        }
        if target.role == role {
            return Ok(target.into());
        }

        let updated = self
            .users
            .update(id, |u| u.role = role)
            .await?
            .ok_or_else(|| AppError::not_found("User", &id.to_string()))?;

        self.audit
            .log(
                actor,
                AuditAction::ChangeRole,
                Some(&updated),
                format!("Role changed from {} to {}", target.role, role),
                client,
                now,
            )
            .await;
        self.notifications
            .notify(
                NotificationKind::RoleChange {
                    user_id: updated.id,
                    user_email: updated.email.clone(),
                    role,
                },
                now,
            )
            .await;

        Ok(updated.into())
    }

    pub async fn audit_logs(&self) -> Result<Vec<AuditLog>, AppError> {
        self.audit.entries().await
    }
}
