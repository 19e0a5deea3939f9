//! LightBnB HTTP server library.
//!
//! Wires the data access functions from `lightbnb-queries` to JSON routes.
//! The connection pool is created once by the binary and reaches every
//! handler through [`AppState`].

pub mod api;
pub mod config;
pub mod password;

use axum::{routing::get, Extension, Json, Router};
use lightbnb_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/users",
            get(api::get_user_by_email_handler).post(api::create_user_handler),
        )
        .route("/api/users/{id}", get(api::get_user_handler))
        .route(
            "/api/users/{id}/reservations",
            get(api::list_reservations_handler),
        )
        .route(
            "/api/properties",
            get(api::search_properties_handler).post(api::create_property_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
