//! Router assembly.

pub mod auth;
pub mod videos;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{delete, get, patch, post};
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", post(videos::generate_video))
        .route("/api/videos", get(videos::list_videos))
        .route("/api/videos/{id}", delete(videos::delete_video))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", patch(auth::update_profile))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `GET /health` — liveness probe, no auth.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": timestamp,
        "uptime": state.uptime_secs(),
    }))
}
