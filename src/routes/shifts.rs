use actix_web::web;

use crate::handlers::shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shifts")
            .route("", web::get().to(shifts::list_shifts))
            .route("", web::post().to(shifts::create_shift))
            // Static segments before /{id}
            .route("/bulk", web::post().to(shifts::bulk_create_shifts))
            .route("/upcoming", web::get().to(shifts::upcoming_shifts))
            .route("/{id}", web::get().to(shifts::get_shift))
            .route("/{id}", web::put().to(shifts::update_shift))
            .route("/{id}", web::delete().to(shifts::delete_shift))
            .route("/{id}/toggle-paid", web::post().to(shifts::toggle_paid)),
    );
}
