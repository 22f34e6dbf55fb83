use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotificationQuery {
    pub unread: Option<bool>,
}

pub async fn list_notifications(
    state: web::Data<AppState>,
    ctx: UserContext,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let list = state
        .notification_service
        .list(query.unread.unwrap_or(false))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let notification = state
        .notification_service
        .mark_read(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(notification)))
}

pub async fn mark_all_read(state: web::Data<AppState>, ctx: UserContext) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let updated = state.notification_service.mark_all_read().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({ "updated": updated }))))
}

pub async fn delete_notification(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    state
        .notification_service
        .delete(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Notification deleted")))
}

pub async fn clear_notifications(
    state: web::Data<AppState>,
    ctx: UserContext,
) -> Result<HttpResponse> {
    ctx.requires_superuser()?;

    let removed = state.notification_service.clear().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({ "removed": removed }))))
}
