use actix_web::web;

use crate::handlers::admin;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(admin::get_users))
            .route("/users", web::post().to(admin::create_user))
            .route(
                "/users/{id}/toggle-status",
                web::post().to(admin::toggle_user_status),
            )
            .route(
                "/users/{id}/reset-password",
                web::post().to(admin::reset_password),
            )
            .route("/users/{id}/role", web::put().to(admin::update_role))
            .route("/audit-logs", web::get().to(admin::get_audit_logs)),
    );
}
