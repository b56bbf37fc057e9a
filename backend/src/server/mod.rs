//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{live, ready};
use crate::inbound::http::{HealthState, HttpState, configure_api};
use crate::middleware::Trace;

use state_builders::build_http_state;

/// Everything one worker's `App` needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
}

impl AppDependencies {
    /// Build handler state from `config` alongside `health_state`.
    pub fn from_config(health_state: web::Data<HealthState>, config: &ServerConfig) -> Self {
        Self {
            health_state,
            http_state: web::Data::new(build_http_state(config)),
        }
    }
}

/// The application: `/api` routes, probes, tracing and, in debug builds,
/// Swagger UI at `/docs`.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies::from_config(health_state.clone(), &config);
    let bind_addr = config.bind_addr();
    info!(
        %bind_addr,
        database = config.uses_database(),
        "starting bookshelf server"
    );

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
