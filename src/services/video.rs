//! Generated-video store — owner-scoped CRUD and pagination.
//!
//! ERROR HANDLING
//! ==============
//! Lookups are always scoped by owner in a single statement; a video that
//! exists but belongs to someone else is indistinguishable from one that
//! never existed.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub const PAGE_SIZE: i64 = 12;

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("video not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from the `generated_videos` table.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_url: String,
    pub video_name: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One page of a user's videos, newest first.
#[derive(Debug, serde::Serialize)]
pub struct VideoPage {
    pub videos: Vec<VideoRow>,
    pub page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Persist one completed generation. Called exactly once per successful
/// external call; rows are never updated afterwards.
pub async fn create_video(
    pool: &PgPool,
    user_id: Uuid,
    video_url: &str,
    video_name: &str,
) -> Result<VideoRow, VideoError> {
    let row = sqlx::query_as::<_, VideoRow>(
        r"INSERT INTO generated_videos (user_id, video_url, video_name, status)
          VALUES ($1, $2, $3, 'completed')
          RETURNING id, user_id, video_url, video_name, status, created_at",
    )
    .bind(user_id)
    .bind(video_url)
    .bind(video_name)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List the caller's videos, newest first, [`PAGE_SIZE`] per page. Pages
/// are 1-based; anything below 1 is clamped.
pub async fn list_videos(pool: &PgPool, user_id: Uuid, page: i64) -> Result<VideoPage, VideoError> {
    let page = page.max(1);
    let offset = (page - 1) * PAGE_SIZE;

    let total: i64 = sqlx::query_scalar("SELECT count(*) FROM generated_videos WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let videos = sqlx::query_as::<_, VideoRow>(
        r"SELECT id, user_id, video_url, video_name, status, created_at
          FROM generated_videos
          WHERE user_id = $1
          ORDER BY created_at DESC, id DESC
          LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total_pages = total_pages(total);
    Ok(VideoPage {
        videos,
        page,
        total,
        total_pages,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
    })
}

/// Delete a video owned by the caller. The owner check lives inside the
/// DELETE itself so other users' rows never leak their existence.
pub async fn delete_video(pool: &PgPool, video_id: Uuid, user_id: Uuid) -> Result<(), VideoError> {
    let result = sqlx::query("DELETE FROM generated_videos WHERE id = $1 AND user_id = $2")
        .bind(video_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(VideoError::NotFound(video_id));
    }
    Ok(())
}

pub(crate) fn total_pages(total: i64) -> i64 {
    // `i64::div_ceil` is still unstable (int_roundings); for non-negative
    // counts this is the equivalent stable ceiling division.
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

#[cfg(test)]
#[path = "video_test.rs"]
mod tests;
