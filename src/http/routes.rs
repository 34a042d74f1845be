use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Dashboard view
        .route("/session/snapshot", get(handlers::get_snapshot))
        // Device control
        .route("/session/camera/toggle", post(handlers::toggle_camera))
        .route("/session/recording/toggle", post(handlers::toggle_recording))
        // One-shot analysis
        .route("/session/frame", post(handlers::capture_frame))
        .route(
            "/session/text",
            post(handlers::submit_text).delete(handlers::clear_text),
        )
        // Report and assistant
        .route("/session/report", post(handlers::generate_report))
        .route("/session/assistant", post(handlers::ask_assistant))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // The dashboard page is served from its own origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
