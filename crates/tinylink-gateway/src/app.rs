use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_link_handler, health_handler, save_link_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/v1/link", post(save_link_handler))
            .route("/api/v1/link/", post(save_link_handler))
            .route("/api/v1/link/{link}", get(get_link_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
