use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/summary", web::get().to(reports::summary))
            .route("/dashboard", web::get().to(reports::dashboard))
            .route("/export.csv", web::get().to(reports::export_csv)),
    );
}
