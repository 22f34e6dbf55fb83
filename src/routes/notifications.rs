use actix_web::web;

use crate::handlers::notifications;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::list_notifications))
            .route("", web::delete().to(notifications::clear_notifications))
            .route("/read-all", web::post().to(notifications::mark_all_read))
            .route("/{id}/read", web::post().to(notifications::mark_read))
            .route("/{id}", web::delete().to(notifications::delete_notification)),
    );
}
