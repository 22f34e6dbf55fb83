#![allow(dead_code, unused_macros)]

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    test::TestRequest,
    web,
};
use fake::{Fake, faker::name::en::Name};
use serde_json::json;
use uuid::Uuid;

use medshift::middleware::{RequestIdMiddleware, RequestInfoMiddleware};
use medshift::{AppState, Config, Storage, routes};

pub const ADMIN_EMAIL: &str = "admin@medshift.com";
pub const ADMIN_PASSWORD: &str = "Admin#2024";
pub const PASSWORD: &str = "Str0ng!Pass";

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Memory-backed state with the bootstrap superuser already created
pub async fn test_state() -> (web::Data<AppState>, web::Data<Config>) {
    setup_test_env();
    let config = Config::test_config();
    let state = AppState::new(Storage::memory(), config.clone());
    let now = chrono::Local::now().naive_local();
    state
        .auth_service
        .ensure_default_superuser(now)
        .await
        .expect("bootstrap superuser");

    (web::Data::new(state), web::Data::new(config))
}

pub fn app(
    state: web::Data<AppState>,
    config: web::Data<Config>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(config)
        .wrap(RequestInfoMiddleware)
        .wrap(RequestIdMiddleware)
        .configure(routes::configure)
}

pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn register_request(email: &str) -> TestRequest {
    let name: String = Name().fake();
    TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
        "name": name,
        "email": email,
        "password": PASSWORD,
        "confirmPassword": PASSWORD,
    }))
}

pub fn login_request(email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

pub fn hospital_request(token: &str, name: &str, rate: f64) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/hospitals")
        .insert_header(bearer(token))
        .set_json(json!({
            "name": name,
            "hourlyRate": rate,
            "address": "Rua das Flores, 123",
            "color": "#3B82F6",
        }))
}

/// Registers a fresh account; evaluates to `(token, user_json)`
macro_rules! register {
    ($app:expr) => {{
        let req = common::register_request(&common::unique_email()).to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        assert_eq!(body["success"], true, "registration failed: {}", body);
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"].clone(),
        )
    }};
}

/// Logs in as the bootstrap superuser; evaluates to the token
macro_rules! admin_token {
    ($app:expr) => {{
        let req = common::login_request(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }};
}

/// Creates a hospital for the token's owner; evaluates to its id
macro_rules! create_hospital {
    ($app:expr, $token:expr, $name:expr, $rate:expr) => {{
        let req = common::hospital_request($token, $name, $rate).to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        assert_eq!(body["success"], true, "hospital creation failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }};
}
