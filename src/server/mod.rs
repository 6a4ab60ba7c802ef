//! HTTP item service.
//!
//! Routes:
//! - `GET  /api/items`            list items for the calling voter
//! - `POST /api/items`            create an item
//! - `POST /api/items/{id}/vote`  cast the caller's ballot
//! - `GET  /health`               liveness probe

mod error;
mod handlers;
mod shutdown;
mod voter;

pub use error::{ApiError, ToErrorCode};
pub use shutdown::shutdown_signal;
pub use voter::{is_valid_token, VoterToken, VOTER_COOKIE};

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

use crate::cors::build_cors_layer;
use crate::http_logging::HttpLoggingLayer;
use crate::store::ItemStore;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: ItemStore,
}

impl AppState {
    #[must_use]
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }
}

/// The bare API router: routes plus the voter cookie middleware.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route("/api/items/{id}/vote", post(handlers::vote_item))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(voter::voter_middleware))
        .with_state(state)
}

/// The router wrapped in the CORS and request logging layers.
#[must_use]
pub fn app(state: Arc<AppState>, cors_origins: Vec<String>) -> Router {
    router(state)
        .layer(HttpLoggingLayer)
        .layer(build_cors_layer(cors_origins))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Item service listening on {addr}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
