//! Config service HTTP API.

mod handlers;

pub use handlers::*;

use crate::store::ConfigStore;

use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
}

/// Web server for the endpoint configuration API.
pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub fn new(store: Arc<ConfigStore>, addr: SocketAddr) -> Self {
        Self {
            state: AppState { store },
            addr,
        }
    }

    /// Build the router with all routes.
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/endpoints", get(handlers::list_endpoints))
            .route(
                "/endpoints/{id}",
                get(handlers::get_endpoint).post(handlers::upsert_endpoint),
            )
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process terminates.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let router = self.routes();

        tracing::info!("config service listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
