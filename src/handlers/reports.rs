use actix_web::{HttpResponse, Result, http::header, web};

use crate::AppState;
use crate::database::models::{ExportOptions, ShiftFilter};
use crate::handlers::shared::ApiResponse;
use crate::services::{
    HospitalService, ShiftService, UserContext,
    export::{ExportContext, shifts_to_csv},
    reports,
};

pub async fn summary(
    state: web::Data<AppState>,
    ctx: UserContext,
    filter: web::Query<ShiftFilter>,
) -> Result<HttpResponse> {
    let today = chrono::Local::now().date_naive();
    let shifts = ShiftService::for_user(&state.storage, ctx.user_id())
        .list(&ShiftFilter::default(), today)
        .await?;
    let hospitals = HospitalService::for_user(&state.storage, ctx.user_id())
        .list()
        .await?;

    let report = reports::build_report(&shifts, &hospitals, &filter, today);
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub async fn dashboard(state: web::Data<AppState>, ctx: UserContext) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let shifts = ShiftService::for_user(&state.storage, ctx.user_id())
        .list(&ShiftFilter::default(), now.date())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(reports::dashboard(&shifts, now))))
}

pub async fn export_csv(
    state: web::Data<AppState>,
    ctx: UserContext,
    filter: web::Query<ShiftFilter>,
    options: web::Query<ExportOptions>,
) -> Result<HttpResponse> {
    let now = chrono::Local::now().naive_local();
    let shifts = ShiftService::for_user(&state.storage, ctx.user_id())
        .list(&filter, now.date())
        .await?;
    let hospitals = HospitalService::for_user(&state.storage, ctx.user_id())
        .list()
        .await?;

    let hospital_name = filter
        .hospital_id
        .and_then(|id| hospitals.iter().find(|h| h.id == id))
        .map(|h| h.name.as_str());
    let export_ctx = ExportContext {
        period_label: filter.period.label(),
        hospital_name,
        show_economic_values: options.show_economic_values(),
        generated_at: now,
    };
    let csv = shifts_to_csv(&shifts, &hospitals, &export_ctx);

    log::info!(
        "User {} exported {} shift(s) as CSV",
        ctx.user_email(),
        shifts.len()
    );

    let filename = format!("plantoes-{}.csv", now.format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv))
}
