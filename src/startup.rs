use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::MarketplaceConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use crate::services::MarketplaceDb;

#[derive(Clone)]
pub struct AppState {
    pub config: MarketplaceConfig,
    pub db: MarketplaceDb,
}

pub fn build_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route(
            "/services",
            post(handlers::create_service).get(handlers::list_services),
        )
        .route(
            "/services/:id",
            get(handlers::get_service)
                .patch(handlers::update_service)
                .delete(handlers::delete_service),
        )
        .route("/services/:id/review", post(handlers::add_review))
        .route("/myservices", get(handlers::my_services))
        .route(
            "/bookings",
            post(handlers::create_booking).get(handlers::list_bookings),
        )
        .route("/bookings/:id", delete(handlers::delete_booking))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Skipping invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        cors.allow_origin(origins)
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to the store, ensures indexes, and binds the listener.
    /// Binding to port 0 picks a free port; `port()` reports the real one.
    pub async fn build(config: MarketplaceConfig) -> Result<Self, AppError> {
        let db = MarketplaceDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
        db.initialize_indexes().await?;

        let state = AppState {
            config: config.clone(),
            db,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Listening");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MarketplaceDb {
        &self.state.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
