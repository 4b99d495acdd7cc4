// Company API
// Company registry with JWT authentication and fire-and-forget domain events

pub mod auth;
pub mod companies;
pub mod config;
pub mod docs;
pub mod error;
pub mod events;
pub mod health;
pub mod models;
pub mod storage;
pub mod validation;

use axum::{
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{login_handler, register_handler, require_auth, AuthService, TokenService};
use crate::companies::{
    create_company_handler, delete_company_handler, get_company_handler,
    missing_company_id_handler, update_company_handler, CompanyService,
};
use crate::config::Config;
use crate::docs::ApiDoc;
use crate::error::ApiError;
use crate::events::{EventDispatcher, LogEventBus};
use crate::storage::DynStorage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub companies: CompanyService,
    pub dispatcher: Arc<EventDispatcher>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire every component from the configuration and the chosen storage
    pub fn new(config: &Config, storage: DynStorage) -> Self {
        let tokens = Arc::new(TokenService::new(config.jwt_secret()));

        Self {
            auth: AuthService::new(storage.clone(), tokens.clone(), config.storage_timeout),
            companies: CompanyService::new(storage.clone(), config.storage_timeout),
            dispatcher: Arc::new(EventDispatcher::new(
                Arc::new(LogEventBus),
                storage,
                config.max_inflight_dispatches,
            )),
            tokens,
        }
    }
}

/// Creates and configures the application router
/// Protected routes sit behind `require_auth`; everything gets CORS, tracing
/// and panic recovery
pub fn create_router(state: AppState) -> Router {
    let authenticated = from_fn_with_state(state.tokens.clone(), require_auth);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route(
            "/company/create",
            post(create_company_handler).route_layer(authenticated.clone()),
        )
        .route(
            "/company/",
            get(missing_company_id_handler).merge(
                put(missing_company_id_handler)
                    .delete(missing_company_id_handler)
                    .route_layer(authenticated.clone()),
            ),
        )
        .route(
            "/company/:id",
            get(get_company_handler).merge(
                put(update_company_handler)
                    .delete(delete_company_handler)
                    .route_layer(authenticated),
            ),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    ApiError::internal("handler panicked").into_response()
}

/// Initialise the global tracing subscriber; RUST_LOG overrides LOG_LEVEL
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
