use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::HospitalInput;
use crate::handlers::shared::ApiResponse;
use crate::services::{HospitalService, UserContext};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HospitalListQuery {
    pub enabled: Option<bool>,
}

fn service(state: &AppState, ctx: &UserContext) -> HospitalService {
    HospitalService::for_user(&state.storage, ctx.user_id())
}

pub async fn list_hospitals(
    state: web::Data<AppState>,
    ctx: UserContext,
    query: web::Query<HospitalListQuery>,
) -> Result<HttpResponse> {
    let service = service(&state, &ctx);
    let hospitals = if query.enabled == Some(true) {
        service.enabled().await?
    } else {
        service.list().await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(hospitals)))
}

pub async fn get_hospital(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let hospital = service(&state, &ctx).get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(hospital)))
}

pub async fn create_hospital(
    state: web::Data<AppState>,
    ctx: UserContext,
    input: web::Json<HospitalInput>,
) -> Result<HttpResponse> {
    let hospital = service(&state, &ctx).add(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(hospital)))
}

pub async fn update_hospital(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
    input: web::Json<HospitalInput>,
) -> Result<HttpResponse> {
    let hospital = service(&state, &ctx)
        .edit(path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(hospital)))
}

pub async fn toggle_hospital(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let hospital = service(&state, &ctx)
        .toggle_status(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(hospital)))
}

pub async fn delete_hospital(
    state: web::Data<AppState>,
    ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service(&state, &ctx).delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Hospital deleted successfully")))
}
