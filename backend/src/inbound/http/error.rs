//! HTTP mapping for domain errors.
//!
//! Every failure leaves the service as
//!
//! ```text
//! { "success": false, "error": "...", "code": "not_found", "statusCode": 404,
//!   "traceId": "...", "details": { ... } }
//! ```
//!
//! with the trace identifier also echoed in the `trace-id` header. Internal
//! error messages are replaced with a generic one outside debug builds.
//! Extractor failures (bad JSON, bad query strings) are routed through the
//! same envelope by the handlers installed with [`json_config`] and
//! [`query_config`].

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED_MESSAGE: &str = "Internal server error";

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    #[schema(example = "book not found")]
    pub error: String,
    /// Machine-readable code.
    pub code: ErrorCode,
    /// HTTP status, repeated for clients that only see the body.
    #[schema(example = 404)]
    pub status_code: u16,
    /// Request correlation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Structured context such as `{ "field": "rating", "code": "out_of_range" }`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::DuplicateEmail | ErrorCode::InvalidCredentials => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ErrorEnvelope {
    /// Envelope for `error`; internal details are dropped when `redact` is set.
    pub(crate) fn from_error(error: &Error, redact: bool) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        let (message, details) = if internal && redact {
            (REDACTED_MESSAGE.to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        Self {
            success: false,
            error: message,
            code: error.code(),
            status_code: status_for(error.code()).as_u16(),
            trace_id: error.trace_id().map(str::to_owned),
            details,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from_error(self, !cfg!(debug_assertions)))
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid request body: {inner}"),
        _ => "invalid request body".to_owned(),
    };
    Error::invalid_request(message).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("invalid query string: {err}")).into()
}

/// JSON extractor configuration reporting failures in the error envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor configuration reporting failures in the error envelope.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}
