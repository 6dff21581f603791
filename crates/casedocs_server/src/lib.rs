//! HTTP server wiring for casedocs (router, authorization, handlers, shared state).

/// Request authorization guard.
pub mod auth;
/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for folder endpoints.
pub mod handlers;

pub use auth::{AuthorizationGuard, Caller, ServiceTokenVerifier, StaticTokenVerifier};
pub use casedocs_core::{
    config, db, models, AppError, Config, DataBinder, Database, FolderService, DEFAULT_PORT,
};

use casedocs_core::constants::{SERVICE_AUTHORIZATION_HEADER, USER_ID_HEADER};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub folders: Arc<dyn FolderService>,
    pub config: Arc<Config>,
    pub guard: Arc<AuthorizationGuard>,
}

impl AppState {
    /// State backed by the redb folder service, authorized from `config`.
    pub fn new(config: Config, db: Database) -> Self {
        Self::with_service(config, Arc::new(db))
    }

    /// State around any [`FolderService`] implementation.
    pub fn with_service(config: Config, folders: Arc<dyn FolderService>) -> Self {
        let guard = Arc::new(AuthorizationGuard::from_config(&config));
        Self::with_guard(config, folders, guard)
    }

    /// State with an explicit authorization guard.
    pub fn with_guard(
        config: Config,
        folders: Arc<dyn FolderService>,
        guard: Arc<AuthorizationGuard>,
    ) -> Self {
        Self {
            folders,
            config: Arc::new(config),
            guard,
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// Folder routes sit behind [`auth::require_authorized`]; `/health` does not.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::DELETE,
    ];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{}", cors_port),
        format!("http://127.0.0.1:{}", cors_port),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();
    let mut headers = vec![header::CONTENT_TYPE, header::ACCEPT];
    headers.extend(
        [USER_ID_HEADER, SERVICE_AUTHORIZATION_HEADER]
            .iter()
            .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok()),
    );
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let folder_routes = Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/", post(handlers::folder::create_folder))
        .route(
            "/folders/:id",
            get(handlers::folder::get_folder).delete(handlers::folder::delete_folder),
        )
        .route(
            "/folders/:id/documents",
            post(handlers::folder::post_documents),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_authorized,
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(folder_routes)
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_upload_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
