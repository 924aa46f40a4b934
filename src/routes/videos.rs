//! Video API routes — generation, listing, deletion.
//!
//! The POST /api handler is the framework boundary the rate limiter guards:
//! a denied client is turned away before the prompt is even looked at.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::rate_limit::Decision;
use crate::routes::auth::{AuthUser, failure};
use crate::services::generate::{self, GenerateError};
use crate::services::video::{self, VideoError};
use crate::state::AppState;

/// `POST /api` — generate a video from a text prompt.
pub async fn generate_video(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    auth: AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Decision::Deny { retry_after } = state.rate_limiter.admit(&addr.ip().to_string()) {
        tracing::warn!(client = %addr.ip(), user_id = %auth.user.id, "generation request rate-limited");
        return rate_limited_response(retry_after.as_secs().max(1));
    }

    match generate::handle_prompt(&state, auth.user.id, body.get("userPrompt")).await {
        Ok(record) => Json(json!({
            "success": true,
            "message": "Video generated successfully!",
            "video": {
                "id": record.id,
                "url": record.video_url,
                "prompt": record.video_name,
            },
        }))
        .into_response(),
        Err(e) => generate_error_response(&e),
    }
}

fn rate_limited_response(retry_after_secs: u64) -> Response {
    let mut response = failure(
        StatusCode::TOO_MANY_REQUESTS,
        "Too many video generation requests, please try again later.",
    );
    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        response.headers_mut().insert(RETRY_AFTER, value);
    }
    response
}

pub(crate) fn generate_error_response(err: &GenerateError) -> Response {
    match err {
        GenerateError::InvalidPrompt(e) => failure(StatusCode::BAD_REQUEST, &e.to_string()),
        GenerateError::ExternalApi(_) => {
            failure(StatusCode::BAD_GATEWAY, "External API error. Please try again later.")
        }
        GenerateError::Internal(_) => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate video. Please try again.")
        }
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
}

/// `GET /api/videos` — the caller's videos, newest first, paginated.
pub async fn list_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Response {
    match video::list_videos(&state.pool, auth.user.id, query.page.unwrap_or(1)).await {
        Ok(page) => Json(json!({
            "success": true,
            "videos": page.videos,
            "page": page.page,
            "total": page.total,
            "total_pages": page.total_pages,
            "has_next_page": page.has_next_page,
            "has_prev_page": page.has_prev_page,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %auth.user.id, "video listing failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error loading your videos")
        }
    }
}

/// `DELETE /api/videos/:id` — delete one of the caller's videos.
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> Response {
    match video::delete_video(&state.pool, video_id, auth.user.id).await {
        Ok(()) => {
            tracing::info!(%video_id, user_id = %auth.user.id, "video deleted");
            Json(json!({ "success": true, "message": "Video deleted successfully" })).into_response()
        }
        Err(VideoError::NotFound(_)) => failure(StatusCode::NOT_FOUND, "Video not found"),
        Err(e) => {
            tracing::error!(error = %e, %video_id, "video delete failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete video")
        }
    }
}

#[cfg(test)]
#[path = "videos_test.rs"]
mod tests;
