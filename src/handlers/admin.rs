use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{CreateUserInput, RoleUpdateInput};
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestInfo;
use crate::services::UserContext;

pub async fn get_users(state: web::Data<AppState>, ctx: UserContext) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let users = state.admin_service.get_all_users().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn create_user(
    state: web::Data<AppState>,
    ctx: UserContext,
    info: RequestInfo,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let now = chrono::Local::now().naive_local();
    let created = state
        .admin_service
        .create_user(&ctx.user, input.into_inner(), &info.client(), now)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

pub async fn toggle_user_status(
    state: web::Data<AppState>,
    ctx: UserContext,
    info: RequestInfo,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let now = chrono::Local::now().naive_local();
    let user = state
        .admin_service
        .toggle_user_status(&ctx.user, path.into_inner(), &info.client(), now)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    ctx: UserContext,
    info: RequestInfo,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let now = chrono::Local::now().naive_local();
    let reset = state
        .admin_service
        .reset_password(&ctx.user, path.into_inner(), &info.client(), now)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reset)))
}

pub async fn update_role(
    state: web::Data<AppState>,
    ctx: UserContext,
    info: RequestInfo,
    path: web::Path<Uuid>,
    input: web::Json<RoleUpdateInput>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let now = chrono::Local::now().naive_local();
    let user = state
        .admin_service
        .update_role(&ctx.user, path.into_inner(), input.role, &info.client(), now)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn get_audit_logs(state: web::Data<AppState>, ctx: UserContext) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let logs = state.admin_service.audit_logs().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(logs)))
}
