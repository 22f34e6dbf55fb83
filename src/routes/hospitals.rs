use actix_web::web;

use crate::handlers::hospitals;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/hospitals")
            .route("", web::get().to(hospitals::list_hospitals))
            .route("", web::post().to(hospitals::create_hospital))
            .route("/{id}", web::get().to(hospitals::get_hospital))
            .route("/{id}", web::put().to(hospitals::update_hospital))
            .route("/{id}", web::delete().to(hospitals::delete_hospital))
            .route("/{id}/toggle", web::post().to(hospitals::toggle_hospital)),
    );
}
