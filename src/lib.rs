pub mod config;
pub mod domain;
pub mod error;
pub mod validation;
mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use config::EngineCatalog;

// Application state
pub struct AppState {
    pub catalog: EngineCatalog,
}

impl AppState {
    pub fn new(catalog: EngineCatalog) -> Arc<Self> {
        Arc::new(Self { catalog })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::search::index))
        .route("/engines", get(handlers::search::list_engines))
        .route("/search", get(handlers::search::search))
        .route("/expand", get(handlers::expand::expand))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
