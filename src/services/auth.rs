use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web::Data};
use bcrypt::{hash, verify};
use chrono::{NaiveDateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::{
    models::{
        AuditAction, AuthResponse, ClientInfo, LoginAttempt, LoginInput, NotificationKind,
        ProfileUpdateInput, RegisterInput, User, UserInfo, UserRole, normalize_email,
    },
    repositories::{AuditLogRepository, LoginAttemptRepository, NotificationRepository, UserRepository},
    store::Storage,
};
use crate::error::AppError;
use crate::services::{
    audit_logger::AuditLogger,
    notifications::NotificationService,
    validation::{ValidationErrors, password_problems, validate_login, validate_profile, validate_register},
};

pub const TEMPORARY_PASSWORD_LENGTH: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_superuser(&self) -> bool {
        self.role == UserRole::Superuser
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let config = req
            .app_data::<Data<Config>>()
            .ok_or_else(|| AppError::internal_server_error_message("Configuration missing"))?;

        decode_token(token, &config.jwt_secret)
    }
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Rejected token: {}", e);
        AppError::Unauthorized
    })
}

/// Random password that always satisfies the strength rules
pub fn generate_temporary_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ\
                             abcdefghijkmnopqrstuvwxyz\
                             23456789\
                             !@#$%&*";
    let mut rng = rand::rng();

    loop {
        let password: String = (0..TEMPORARY_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect();

        if password_problems(&password).is_empty() {
            return password;
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    login_attempts: LoginAttemptRepository,
    audit: AuditLogger,
    notifications: NotificationService,
    config: Config,
}

impl AuthService {
    pub fn new(storage: &Storage, config: Config) -> Self {
        Self {
            users: UserRepository::new(storage.clone()),
            login_attempts: LoginAttemptRepository::new(
                storage.clone(),
                config.login_attempts_history,
            ),
            audit: AuditLogger::new(AuditLogRepository::new(
                storage.clone(),
                config.max_audit_logs,
            )),
            notifications: NotificationService::new(NotificationRepository::new(
                storage.clone(),
                config.max_notifications,
            )),
            config,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.config.bcrypt_cost)?)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", &id.to_string()))
    }

    pub async fn register(
        &self,
        input: RegisterInput,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<AuthResponse, AppError> {
        validate_register(&input)?;

        let password_hash = self.hash_password(&input.password)?;
        let mut user = User::new(
            input.name,
            input.email,
            password_hash,
            input.specialty,
            UserRole::User,
            now,
        );
        user.last_login = Some(now);

        let user = self.users.create(user).await?.ok_or_else(|| {
            AppError::Conflict("Email already in use. Sign in or use another email.".to_string())
        })?;
        log::info!("User {} registered", user.email);

        self.audit
            .log(&user, AuditAction::Register, None, "New user registered", client, now)
            .await;
        self.notifications
            .notify(
                NotificationKind::NewUser {
                    user_id: user.id,
                    user_email: user.email.clone(),
                },
                now,
            )
            .await;

        let token = self.generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    async fn record_attempt(&self, email: &str, success: bool, client: &ClientInfo, now: NaiveDateTime) {
        let attempt = LoginAttempt {
            email: email.to_string(),
            success,
            ip_address: client.ip_address.clone(),
            timestamp: now,
        };
        if let Err(e) = self.login_attempts.record(attempt).await {
            log::warn!("Failed to record login attempt for {}: {:#}", email, e);
        }
    }

    /// Locked accounts, unknown or inactive accounts and wrong passwords all
    /// count as failed attempts.
    pub async fn login(
        &self,
        input: LoginInput,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) -> Result<AuthResponse, AppError> {
        validate_login(&input)?;
        let email = normalize_email(&input.email);

        let since = TimeDelta::try_minutes(self.config.login_block_minutes)
            .and_then(|block| now.checked_sub_signed(block))
            .unwrap_or(NaiveDateTime::MIN);
        let recent_failures = self.login_attempts.failures_since(&email, since).await?;
        if recent_failures >= self.config.max_login_attempts {
            self.record_attempt(&email, false, client, now).await;
            log::warn!("Login blocked for {} after {} failures", email, recent_failures);
            return Err(AppError::AccountLocked(format!(
                "Too many failed login attempts. Try again in {} minutes.",
                self.config.login_block_minutes
            )));
        }

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active() => user,
            _ => {
                self.record_attempt(&email, false, client, now).await;
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify(&input.password, &user.password_hash)? {
            self.record_attempt(&email, false, client, now).await;
            return Err(AppError::InvalidCredentials);
        }

        let user = self
            .users
            .update(user.id, |u| u.last_login = Some(now))
            .await?
            .unwrap_or(user);

        self.record_attempt(&email, true, client, now).await;
        self.audit
            .log(&user, AuditAction::Login, None, "Successful login", client, now)
            .await;

        let token = self.generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Changes the email and/or the password. A password change requires the
    /// current password and clears `forcePasswordChange`.
    pub async fn update_profile(&self, user_id: Uuid, input: ProfileUpdateInput) -> Result<UserInfo, AppError> {
        let user = self.find_user(user_id).await?;
        validate_profile(&input, user.force_password_change)?;

        let new_email = input
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| *email != user.email);

        let new_hash = match input.new_password.as_deref().filter(|p| !p.is_empty()) {
            Some(new_password) => {
                let current = input.current_password.as_deref().unwrap_or_default();
                if !verify(current, &user.password_hash)? {
                    let mut errors = ValidationErrors::new();
                    errors.add("currentPassword", "Senha atual incorreta");
                    return Err(AppError::ValidationError(errors));
                }
                Some(self.hash_password(new_password)?)
            }
            None => None,
        };

        if new_email.is_none() && new_hash.is_none() {
            return Ok(user.into());
        }

        // Uniqueness is checked in the same write as the change
        let updated = self
            .users
            .modify(|users| {
                if let Some(email) = &new_email {
                    if users.iter().any(|u| u.id != user_id && u.email == *email) {
                        return Err(AppError::Conflict("Email already in use".to_string()));
                    }
                }
                let u = users
                    .iter_mut()
                    .find(|u| u.id == user_id)
                    .ok_or_else(|| AppError::not_found("User", &user_id.to_string()))?;
                if let Some(email) = new_email {
                    u.email = email;
                }
                if let Some(password_hash) = new_hash {
                    u.password_hash = password_hash;
                    u.force_password_change = false;
                }
                Ok(u.clone())
            })
            .await?;

        log::info!("Profile of user {} updated", updated.id);
        Ok(updated.into())
    }

    pub async fn set_notifications_enabled(&self, user_id: Uuid, enabled: bool) -> Result<UserInfo, AppError> {
        self.users
            .update(user_id, |u| u.notifications_enabled = enabled)
            .await?
            .map(UserInfo::from)
            .ok_or_else(|| AppError::not_found("User", &user_id.to_string()))
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = TimeDelta::try_days(self.config.jwt_expiration_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| AppError::internal_server_error_message("Token expiration out of range"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode_token(token, &self.config.jwt_secret)
    }

    /// Creates the configured superuser when no account exists yet. Without
    /// `ADMIN_PASSWORD` a random password is generated and logged once.
    pub async fn ensure_default_superuser(&self, now: NaiveDateTime) -> Result<bool, AppError> {
        if self.users.count().await? > 0 {
            return Ok(false);
        }

        let (password, generated) = match &self.config.admin_password {
            Some(password) => (password.clone(), false),
            None => (generate_temporary_password(), true),
        };

        let mut admin = User::new(
            "Administrador".to_string(),
            self.config.admin_email.clone(),
            self.hash_password(&password)?,
            None,
            UserRole::Superuser,
            now,
        );
        admin.force_password_change = generated;
        let email = admin.email.clone();

        if !self.users.create_if_empty(admin).await? {
            return Ok(false);
        }

        log::info!("Created default superuser {}", email);
        if generated {
            log::warn!(
                "Generated password for {}: {} (change it after the first login)",
                email,
                password
            );
        }
        Ok(true)
    }
}
