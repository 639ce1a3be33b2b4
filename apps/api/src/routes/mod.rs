pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::enhance::handlers as enhance;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(render::handle_list_templates))
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render/report", post(render::handle_render_report))
        .route("/api/v1/enhance", post(enhance::handle_enhance))
        .with_state(state)
}
