use axum::{Router, routing::get};

pub mod dashboard;
pub mod items;
pub mod system;

/// Router for the dashboard and management endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/items", items::router())
}
