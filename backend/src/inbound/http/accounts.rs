//! Account handlers.
//!
//! ```text
//! POST /api/auth/signup  {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/auth/login   {"email":"ada@example.com","password":"secret1"}
//! GET  /api/auth/profile (Bearer)
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LoginSession, Profile};
use crate::domain::{ApiResult, LoginCredentials, SignupDetails, User};

use super::auth::Authenticated;
use super::envelope::Envelope;
use super::error::ErrorEnvelope;
use super::state::HttpState;

/// Signup request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "analytical")]
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "analytical")]
    pub password: Option<String>,
}

/// Register an account.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = Envelope<User>),
        (status = 400, description = "Missing field, short password or email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let details = SignupDetails::try_from_parts(
        name.as_deref().unwrap_or_default(),
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )?;
    let user = state.accounts.signup(details).await?;
    Ok(Envelope::created(user, "Registration successful"))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = Envelope<LoginSession>),
        (status = 400, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )?;
    let session = state.accounts.login(credentials).await?;
    Ok(Envelope::ok(session, "Login successful"))
}

/// The caller's account, books and reviews.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile", body = Envelope<Profile>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "profile",
    security(("bearer" = []))
)]
#[get("/auth/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<HttpResponse> {
    let profile = state.profiles.profile(&auth.user_id()).await?;
    Ok(Envelope::ok(profile, "Profile fetched successfully"))
}
