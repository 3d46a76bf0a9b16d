use std::sync::Arc;

use actix_web::{http::header::AUTHORIZATION, test, web, App, HttpResponse, Responder};
use serde_json::{json, Value};

use quizgate_server::{
    app_state::AppState,
    auth::{middleware::AuthGate, UserRole},
    config::Config,
    handlers::{logout, me, refresh_token, token_info, validate_refresh_token, validate_token},
};

async fn open_route() -> impl Responder {
    HttpResponse::Ok().body("anonymous ok")
}

fn test_config() -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_origin: "http://localhost:5173".to_string(),
        jwt_secret: secrecy::SecretString::from(
            "integration_test_secret_key_32_bytes!!".to_string(),
        ),
        access_token_ttl_seconds: 3600,
        refresh_token_ttl_seconds: 604_800,
    }
}

fn test_state() -> AppState {
    AppState::new(test_config()).unwrap()
}

fn expired_access_state() -> AppState {
    AppState::new(Config {
        access_token_ttl_seconds: -10,
        ..test_config()
    })
    .unwrap()
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::from(Arc::clone(&$state.validator)))
                .wrap(AuthGate)
                .service(refresh_token)
                .service(validate_token)
                .service(validate_refresh_token)
                .service(token_info)
                .service(logout)
                .service(me)
                .route("/open", web::get().to(open_route)),
        )
        .await
    };
}

#[actix_web::test]
async fn request_without_header_passes_through() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/open").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
}

#[actix_web::test]
async fn garbage_bearer_token_is_rejected_with_invalid_code() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/open")
        .insert_header((AUTHORIZATION, "Bearer <garbage>"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "INVALID_TOKEN");
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn expired_access_token_is_rejected_with_expired_code() {
    let state = expired_access_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/open")
        .insert_header((AUTHORIZATION, format!("Bearer {}", pair.token)))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[actix_web::test]
async fn valid_token_reaches_identity_route() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((AUTHORIZATION, format!("Bearer {}", pair.token)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["subject"], "alice@example.com");
    assert_eq!(body["role"], "STUDENT");
}

#[actix_web::test]
async fn refresh_rotation_is_single_use() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Teacher)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/token/refresh")
        .set_json(json!({ "token": pair.refresh_token }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["subject"], "alice@example.com");
    assert_eq!(body["role"], "TEACHER");
    assert!(body["token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_ne!(body["refresh_token"], pair.refresh_token.as_str());

    // Replaying the consumed refresh token must fail as revoked
    let replay = test::TestRequest::post()
        .uri("/api/token/refresh")
        .set_json(json!({ "token": pair.refresh_token }))
        .to_request();
    let res = test::call_service(&app, replay).await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn refresh_with_access_token_is_rejected() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/token/refresh")
        .set_json(json!({ "token": pair.token }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn logout_revokes_the_presented_token() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header((AUTHORIZATION, format!("Bearer {}", pair.token)))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());

    // The exact revoked string is no longer honored
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((AUTHORIZATION, format!("Bearer {}", pair.token)))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn logout_without_header_is_still_ok() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
}

#[actix_web::test]
async fn info_endpoint_reports_claims() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/token/info")
        .set_json(json!({ "token": pair.token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["subject"], "alice@example.com");
    assert_eq!(body["role"], "STUDENT");
    assert_eq!(body["tokenType"], "access");
    assert_eq!(body["expired"], false);
}

#[actix_web::test]
async fn info_endpoint_reports_expired_claims() {
    let state = expired_access_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/token/info")
        .set_json(json!({ "token": pair.token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["subject"], "alice@example.com");
    assert_eq!(body["expired"], true);
}

#[actix_web::test]
async fn info_endpoint_rejects_garbage_with_400() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/token/info")
        .set_json(json!({ "token": "not.a.token" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status().as_u16(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Invalid token format");
}

#[actix_web::test]
async fn validate_endpoint_reports_wrong_kind() {
    let state = test_state();
    let app = init_app!(state);

    let pair = state
        .token_service
        .issue_pair("alice@example.com", UserRole::Student)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/token/validate")
        .set_json(json!({ "token": pair.refresh_token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], false);
    assert_eq!(body["expired"], false);

    let req = test::TestRequest::post()
        .uri("/api/token/validate-refresh")
        .set_json(json!({ "token": pair.refresh_token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], true);
    assert_eq!(body["subject"], "alice@example.com");
}
