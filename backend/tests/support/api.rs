//! In-process harness driving the full application over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{test, web};
use serde_json::{Value, json};

use bookshelf::inbound::http::HealthState;
use bookshelf::outbound::credentials::{Argon2PasswordHasher, SigningSecret};
use bookshelf::server::{AppDependencies, ServerConfig, build_app};
use bookshelf::test_support::MutableClock;

pub const PASSWORD: &str = "correct horse";

/// Configuration with a fixed secret, a cheap hasher and the given clock.
pub fn config(clock: Arc<MutableClock>) -> ServerConfig {
    let addr = "127.0.0.1:0".parse().expect("socket address");
    ServerConfig::new(addr, SigningSecret::new(vec![7; 32]))
        .with_password_hasher(Argon2PasswordHasher::with_cost(8, 1, 1).expect("argon2 cost"))
        .with_clock(clock)
}

/// Initialise the application service from `config`.
pub async fn spawn_with(
    config: ServerConfig,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let health = web::Data::new(HealthState::new());
    test::init_service(build_app(AppDependencies::from_config(health, &config))).await
}

/// Initialise the application with default test configuration.
pub async fn spawn()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    spawn_with(config(MutableClock::shared())).await
}

/// Send one JSON request and return status plus parsed body.
pub async fn send<S>(
    app: &S,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::default().method(method).uri(path);
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Sign up `name`/`email` with [`PASSWORD`] and return a bearer token.
pub async fn register<S>(app: &S, name: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    login(app, email, PASSWORD).await
}

/// Log in and return the bearer token.
pub async fn login<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("token string")
        .to_owned()
}

/// Add a book and return its id.
pub async fn add_book<S>(app: &S, token: &str, title: &str, genre: &str, year: i64) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        Method::POST,
        "/api/books",
        Some(token),
        Some(json!({
            "title": title,
            "author": "Test Author",
            "description": format!("{title}, a book written for the test suite."),
            "genre": genre,
            "year": year
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "book creation failed: {body}");
    body["data"]["id"].as_str().expect("book id").to_owned()
}

/// Review `book` with `rating` stars.
pub async fn add_review<S>(app: &S, token: &str, book: &str, rating: i64) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        Method::POST,
        &format!("/api/books/{book}/reviews"),
        Some(token),
        Some(json!({ "rating": rating, "reviewText": "Read it twice, liked it more the second time." })),
    )
    .await
}

/// Fetch a book's `data` payload.
pub async fn get_book<S>(app: &S, book: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(app, Method::GET, &format!("/api/books/{book}"), None, None).await;
    assert_eq!(status, StatusCode::OK, "book fetch failed: {body}");
    body["data"].clone()
}
