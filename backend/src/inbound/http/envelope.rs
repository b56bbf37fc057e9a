//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! { "success": true, "data": { ... }, "message": "Book created" }
//! ```
//!
//! Failures use the error envelope built in [`super::error`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
    /// Human-readable summary.
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `data` with `message`.
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// `200 OK` response carrying this envelope.
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        Self::new(data, message).respond(StatusCode::OK)
    }

    /// `201 Created` response carrying this envelope.
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        Self::new(data, message).respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
