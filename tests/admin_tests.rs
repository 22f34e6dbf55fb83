use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

use common::bearer;

#[actix_web::test]
async fn regular_users_are_forbidden() {
    let (state, config) = common::test_state().await;
    let app = test::init_service(common::app(state, config)).await;
    let (token, _) = register!(&app);

    for uri in ["/api/v1/admin/users", "/api/v1/admin/audit-logs", "/api/v1/notifications"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN,
            "{}",
            uri
        );
    }
}

#[actix_web::test]
async fn created_user_logs_in_with_temporary_password() {
    let (state, config) = common::test_state().await;
    let app = test::init_service(common::app(state, config)).await;
    let admin = admin_token!(&app);
    let email = common::unique_email();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/users")
        .insert_header(bearer(&admin))
        .set_json(json!({ "name": "Bruno Lima", "email": email, "specialty": "Pediatria" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["user"]["forcePasswordChange"], true);
    let temporary = body["data"]["temporaryPassword"].as_str().unwrap().to_string();

    let res = test::call_service(&app, common::login_request(&email, &temporary).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn deactivated_user_loses_access() {
    let (state, config) = common::test_state().await;
    let app = test::init_service(common::app(state, config)).await;
    let admin = admin_token!(&app);
    let (token, user) = register!(&app);
    let user_id = user["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/users/{}/toggle-status", user_id))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "inactive");

    // The token is still valid but the account is not
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let email = user["email"].as_str().unwrap();
    let res = test::call_service(&app, common::login_request(email, common::PASSWORD).to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_cannot_demote_or_deactivate_self() {
    let (state, config) = common::test_state().await;
    let app = test::init_service(common::app(state, config)).await;
    let admin = admin_token!(&app);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let admin_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/users/{}/role", admin_id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "role": "user" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/users/{}/toggle-status", admin_id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn reset_password_and_role_change_are_audited() {
    let (state, config) = common::test_state().await;
    let app = test::init_service(common::app(state, config)).await;
    let admin = admin_token!(&app);
    let (_, user) = register!(&app);
    let user_id = user["id"].as_str().unwrap();
    let email = user["email"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/users/{}/reset-password", user_id))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let temporary = body["data"]["temporaryPassword"].as_str().unwrap().to_string();
    assert_eq!(temporary.len(), 12);

    let res = test::call_service(&app, common::login_request(email, &temporary).to_request()).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["user"]["forcePasswordChange"], true);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/users/{}/role", user_id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "role": "superuser" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["role"], "superuser");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/audit-logs")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|log| log["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec!["CHANGE_ROLE", "LOGIN", "RESET_PASSWORD", "REGISTER", "LOGIN"]
    );
}
