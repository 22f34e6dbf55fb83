use actix_web::web;

pub mod admin;
pub mod auth;
pub mod hospitals;
pub mod notifications;
pub mod reports;
pub mod shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(hospitals::configure)
            .configure(shifts::configure)
            .configure(reports::configure)
            .configure(admin::configure)
            .configure(notifications::configure),
    );
}
