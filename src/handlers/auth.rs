use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::models::{
    LoginInput, NotificationSettingsInput, ProfileUpdateInput, RegisterInput, UserInfo,
};
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestInfo;
use crate::services::UserContext;

pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterInput>,
    info: RequestInfo,
) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let response = state
        .auth_service
        .register(request.into_inner(), &info.client(), now)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginInput>,
    info: RequestInfo,
) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let response = state
        .auth_service
        .login(request.into_inner(), &info.client(), now)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(ctx: UserContext) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(ctx.user))))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    ctx: UserContext,
    input: web::Json<ProfileUpdateInput>,
) -> Result<HttpResponse> {
    let user = state
        .auth_service
        .update_profile(ctx.user_id(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        "Profile updated successfully",
    )))
}

pub async fn update_notifications(
    state: web::Data<AppState>,
    ctx: UserContext,
    input: web::Json<NotificationSettingsInput>,
) -> Result<HttpResponse> {
    let user = state
        .auth_service
        .set_notifications_enabled(ctx.user_id(), input.notifications_enabled)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}
