use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::User;
use crate::error::AppError;
use crate::services::auth::Claims;

/// Current user, loaded from the bearer token on every request. Inactive or
/// deleted accounts are rejected even while their token is still valid.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user: User,
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn user_email(&self) -> &str {
        &self.user.email
    }

    pub fn is_superuser(&self) -> bool {
        self.user.is_superuser()
    }

    pub fn requires_superuser(&self) -> Result<(), AppError> {
        if self.is_superuser() {
            Ok(())
        } else {
            log::warn!("User {} attempted a superuser operation", self.user.email);
            Err(AppError::Forbidden("Superuser role required".to_string()))
        }
    }
}

impl FromRequest for UserContext {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Claims::from_request(req, payload).into_inner();
        let state = req.app_data::<Data<AppState>>().cloned();

        Box::pin(async move {
            let claims = claims?;
            let state = state
                .ok_or_else(|| AppError::internal_server_error_message("Application state missing"))?;

            let user = match state.auth_service.find_user(claims.user_id()).await {
                Ok(user) => user,
                Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized),
                Err(e) => return Err(e),
            };

            if !user.is_active() {
                return Err(AppError::Unauthorized);
            }

            Ok(UserContext { user })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::{
        models::{ClientInfo, RegisterInput},
        store::Storage,
    };
    use actix_web::test::TestRequest;

    async fn request_for_registered_user() -> (Storage, HttpRequest) {
        let storage = Storage::memory();
        let config = Config::test_config();
        let state = AppState::new(storage.clone(), config.clone());
        let registered = state
            .auth_service
            .register(
                RegisterInput {
                    name: "Ana Souza".to_string(),
                    email: "ana@example.com".to_string(),
                    password: "Str0ng!Pass".to_string(),
                    confirm_password: "Str0ng!Pass".to_string(),
                    specialty: None,
                },
                &ClientInfo::default(),
                chrono::Local::now().naive_local(),
            )
            .await
            .unwrap();

        let req = TestRequest::get()
            .insert_header(("Authorization", format!("Bearer {}", registered.token)))
            .app_data(Data::new(state))
            .app_data(Data::new(config))
            .to_http_request();
        (storage, req)
    }

    #[actix_web::test]
    async fn loads_the_token_owner() {
        let (_, req) = request_for_registered_user().await;
        let ctx = UserContext::extract(&req).await.unwrap();
        assert_eq!(ctx.user_email(), "ana@example.com");
        assert!(ctx.requires_superuser().is_err());
    }

    #[actix_web::test]
    async fn deleted_user_is_unauthorized() {
        let (storage, req) = request_for_registered_user().await;
        storage.set("medshift-users", "[]".to_string()).await.unwrap();

        let err = UserContext::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[actix_web::test]
    async fn storage_failure_is_not_reported_as_unauthorized() {
        let (storage, req) = request_for_registered_user().await;
        storage.set("medshift-users", "{not json".to_string()).await.unwrap();

        let err = UserContext::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::StorageError(_)));
    }
}
