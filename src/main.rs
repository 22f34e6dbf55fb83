use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use medshift::database::init_storage;
use medshift::middleware::{RequestIdMiddleware, RequestInfoMiddleware};
use medshift::{AppState, Config, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("MedShift API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration (.env included)
    let config = Config::from_env()?;

    env_logger::init();
    log::info!(
        "Starting MedShift API server (environment: {})",
        config.environment
    );

    let storage = init_storage(&config).await?;
    let state = web::Data::new(AppState::new(storage, config.clone()));

    let now = chrono::Local::now().naive_local();
    if state.auth_service.ensure_default_superuser(now).await? {
        log::info!("Bootstrap superuser ready: {}", config.admin_email);
    }

    let bind_address = config.server_address();
    let client_base_url = config.client_base_url.clone();
    let config_data = web::Data::new(config);

    log::info!("Listening on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["Content-Disposition", "X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestInfoMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
