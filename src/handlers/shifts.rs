use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{BulkShiftInput, ShiftFilter, ShiftInput};
use crate::handlers::shared::ApiResponse;
use crate::services::{ShiftService, UserContext};

fn service(state: &AppState, ctx: &UserContext) -> ShiftService {
    ShiftService::for_user(&state.storage, ctx.user_id())
}

pub async fn list_shifts(
    state: web::Data<AppState>,
    ctx: UserContext,
    filter: web::Query<ShiftFilter>,
) -> Result<HttpResponse> {
    let today = chrono::Local::now().date_naive();
    let shifts = service(&state, &ctx).list(&filter, today).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn upcoming_shifts(state: web::Data<AppState>, ctx: UserContext) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let shifts = service(&state, &ctx).upcoming(now).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn get_shift(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let shift = service(&state, &ctx)
        .get_with_status(path.into_inner(), now)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn create_shift(
    state: web::Data<AppState>,
    ctx: UserContext,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse> {
    let shift = service(&state, &ctx).add_shift(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(shift)))
}

pub async fn bulk_create_shifts(
    state: web::Data<AppState>,
    ctx: UserContext,
    input: web::Json<BulkShiftInput>,
) -> Result<HttpResponse> {
    let result = service(&state, &ctx).bulk_add(input.into_inner()).await?;
    let message = format!(
        "{} shift(s) added, {} date(s) skipped due to conflicts",
        result.added_shifts,
        result.conflict_dates.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(Some(result), &message)))
}

pub async fn update_shift(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse> {
    let shift = service(&state, &ctx)
        .edit_shift(path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn toggle_paid(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let shift = service(&state, &ctx).toggle_paid(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn delete_shift(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service(&state, &ctx).delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Shift deleted successfully")))
}
