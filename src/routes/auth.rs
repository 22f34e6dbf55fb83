use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me))
            .route("/profile", web::put().to(auth::update_profile))
            .route("/notifications", web::put().to(auth::update_notifications)),
    );
}
