pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Aggregate read
        .route("/data", get(handlers::pull))
        // Readings pushed by the relay node
        .route("/update", post(handlers::push))
        .route("/health", get(handlers::health))
}

/// The router with its state attached, ready to serve.
pub fn app(state: AppState) -> Router {
    router().with_state(state)
}
