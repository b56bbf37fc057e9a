//! Signup, login, bearer authentication and probes over the full application.

#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use bookshelf::domain::TRACE_ID_HEADER;
use bookshelf::test_support::MutableClock;

use api::{PASSWORD, add_book, add_review, config, register, send, spawn, spawn_with};

#[rstest]
#[actix_web::test]
async fn signup_returns_the_public_user() {
    let app = spawn().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ada", "email": "Ada@Example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Registration successful"));
    assert_eq!(body["data"]["email"], json!("ada@example.com"));
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let app = spawn().await;
    register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Imposter", "email": "ADA@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("duplicate_email"));
}

#[rstest]
#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn().await;
    register(&app, "Ada", "ada@example.com").await;

    let (wrong_status, wrong) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "not the one" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(wrong["error"], json!("Invalid credentials"));
    assert_eq!(unknown["error"], wrong["error"]);
    assert_eq!(unknown["code"], wrong["code"]);
}

#[rstest]
#[case(None)]
#[case(Some("not-a-token"))]
#[actix_web::test]
async fn protected_routes_need_a_valid_bearer(#[case] token: Option<&str>) {
    let app = spawn().await;

    let (status, body) = send(&app, Method::GET, "/api/auth/profile", token, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], json!(401));
}

#[rstest]
#[actix_web::test]
async fn profile_lists_own_books_and_reviews() {
    let app = spawn().await;
    let owner = register(&app, "Owner", "owner@example.com").await;
    let reader = register(&app, "Reader", "reader@example.com").await;
    let book = add_book(&app, &owner, "Well Read", "Fiction", 1999).await;
    add_book(&app, &reader, "Reader's Own", "Essays", 2005).await;
    add_review(&app, &reader, &book, 5).await;

    let (status, body) = send(&app, Method::GET, "/api/auth/profile", Some(&reader), None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["name"], json!("Reader"));
    assert_eq!(body["data"]["books"][0]["title"], json!("Reader's Own"));
    assert_eq!(body["data"]["reviews"][0]["bookTitle"], json!("Well Read"));
    assert_eq!(body["data"]["reviews"][0]["rating"], json!(5));
}

#[rstest]
#[actix_web::test]
async fn tokens_expire_after_a_day() {
    let clock = MutableClock::shared();
    let app = spawn_with(config(clock.clone())).await;
    let token = register(&app, "Ada", "ada@example.com").await;

    clock.advance_seconds(23 * 3600);
    let (fresh, _) = send(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;
    clock.advance_seconds(3600);
    let (stale, _) = send(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;

    assert_eq!(fresh, StatusCode::OK);
    assert_eq!(stale, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("/health/live", StatusCode::OK)]
#[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
#[actix_web::test]
async fn probes_report_process_state(#[case] path: &str, #[case] expected: StatusCode) {
    let app = spawn().await;

    let (status, _) = send(&app, Method::GET, path, None, None).await;

    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn every_response_carries_a_trace_id() {
    let app = spawn().await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/books/not-a-uuid").to_request(),
    )
    .await;

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["traceId"], json!(header));
}
