//! Readiness and liveness probes.
//!
//! Probes answer outside the `/api` scope and never touch the stores, so an
//! unreachable database does not fail liveness.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Process health flags shared between the server and its probes.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    draining: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }
}

impl HealthState {
    /// Not ready, not draining.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip readiness once the stores and services are wired.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail both probes ahead of shutdown.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    /// Whether traffic may be routed here.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && !self.is_draining()
    }

    /// Whether shutdown has begun.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }
}

/// Probe body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ready,
    Starting,
    Alive,
    Draining,
}

#[derive(Serialize)]
struct ProbeBody {
    status: ProbeStatus,
}

fn probe(healthy: bool, status: ProbeStatus) -> HttpResponse {
    let mut response = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeBody { status })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic", body = ProbeStatus),
        (status = 503, description = "Starting up or draining", body = ProbeStatus)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        probe(true, ProbeStatus::Ready)
    } else if state.is_draining() {
        probe(false, ProbeStatus::Draining)
    } else {
        probe(false, ProbeStatus::Starting)
    }
}

/// Liveness probe; fails only once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process alive", body = ProbeStatus),
        (status = 503, description = "Draining", body = ProbeStatus)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_draining() {
        probe(false, ProbeStatus::Draining)
    } else {
        probe(true, ProbeStatus::Alive)
    }
}

#[cfg(test)]
mod tests {
    //! Probe transitions.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn health() -> web::Data<HealthState> {
        web::Data::new(HealthState::new())
    }

    async fn hit(health: web::Data<HealthState>, uri: &str) -> (StatusCode, Value, Option<String>) {
        let app = test::init_service(
            App::new()
                .app_data(health)
                .service(ready)
                .service(live),
        )
        .await;
        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = test::read_body_json(response).await;
        (status, body, cache)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_waits_for_startup(health: web::Data<HealthState>) {
        let (status, body, cache) = hit(health.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "starting" }));
        assert_eq!(cache.as_deref(), Some("no-store"));

        health.mark_ready();
        let (status, body, _) = hit(health, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ready" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn draining_fails_both_probes(health: web::Data<HealthState>) {
        health.mark_ready();
        health.mark_draining();

        let (ready_status, ready_body, _) = hit(health.clone(), "/health/ready").await;
        let (live_status, live_body, _) = hit(health, "/health/live").await;

        assert_eq!(ready_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ready_body, json!({ "status": "draining" }));
        assert_eq!(live_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(live_body, json!({ "status": "draining" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_holds_during_startup(health: web::Data<HealthState>) {
        let (status, body, _) = hit(health, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "alive" }));
    }
}
