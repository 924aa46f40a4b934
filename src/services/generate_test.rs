use super::*;
use crate::services::prompt::PromptError;
use crate::state::test_helpers::{MockBehavior, MockGeneration, test_app_state};
use serde_json::json;

#[tokio::test]
async fn invalid_prompt_never_reaches_the_client() {
    let gooey = MockGeneration::new(MockBehavior::Succeed("https://x/y.mp4".into()));
    let state = test_app_state(gooey.clone());

    let err = handle_prompt(&state, uuid::Uuid::new_v4(), Some(&json!(""))).await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidPrompt(PromptError::Empty)));
    assert_eq!(gooey.call_count(), 0);
}

#[tokio::test]
async fn missing_prompt_never_reaches_the_client() {
    let gooey = MockGeneration::new(MockBehavior::Succeed("https://x/y.mp4".into()));
    let state = test_app_state(gooey.clone());

    let err = handle_prompt(&state, uuid::Uuid::new_v4(), None).await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidPrompt(PromptError::Missing)));
    assert_eq!(gooey.call_count(), 0);
}

/// An upstream failure surfaces as `ExternalApi` — proving the pipeline
/// stopped before the persistence stage (a store attempt against the test
/// pool would have produced `Internal` instead).
#[tokio::test]
async fn upstream_error_short_circuits_before_persistence() {
    let gooey = MockGeneration::new(MockBehavior::FailApi(500));
    let state = test_app_state(gooey.clone());

    let err = handle_prompt(&state, uuid::Uuid::new_v4(), Some(&json!("a calm sea"))).await.unwrap_err();
    assert!(matches!(err, GenerateError::ExternalApi(_)));
    assert_eq!(gooey.call_count(), 1);
}

#[tokio::test]
async fn malformed_upstream_response_is_internal() {
    let gooey = MockGeneration::new(MockBehavior::FailMalformed);
    let state = test_app_state(gooey.clone());

    let err = handle_prompt(&state, uuid::Uuid::new_v4(), Some(&json!("a calm sea"))).await.unwrap_err();
    assert!(matches!(err, GenerateError::Internal(_)));
}

#[tokio::test]
async fn client_receives_the_trimmed_prompt() {
    let gooey = MockGeneration::new(MockBehavior::Succeed("https://x/y.mp4".into()));
    let state = test_app_state(gooey.clone());

    // The store write fails against the test pool; we only care what the
    // external client was handed.
    let _ = handle_prompt(&state, uuid::Uuid::new_v4(), Some(&json!("  white tiger  "))).await;
    assert_eq!(gooey.prompts.lock().unwrap().as_slice(), ["white tiger"]);
}

// =============================================================================
// live-db happy path
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::state::AppState;
    use crate::state::test_helpers::test_config;
    use sqlx::Row;
    use sqlx::postgres::PgPoolOptions;

    async fn live_state(gooey: std::sync::Arc<MockGeneration>) -> AppState {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        let pool = PgPoolOptions::new().connect(&url).await.expect("connect failed");
        AppState::new(pool, gooey, test_config())
    }

    #[tokio::test]
    async fn success_persists_one_completed_record() {
        let gooey = MockGeneration::new(MockBehavior::Succeed("https://x/y.mp4".into()));
        let state = live_state(gooey.clone()).await;

        let email = format!("{}@test.local", uuid::Uuid::new_v4());
        let user_id: uuid::Uuid =
            sqlx::query("INSERT INTO users (email, name, password_hash) VALUES ($1, 'Gen User', 'x') RETURNING id")
                .bind(email)
                .fetch_one(&state.pool)
                .await
                .unwrap()
                .get("id");

        let record = handle_prompt(&state, user_id, Some(&serde_json::json!("a calm sea"))).await.unwrap();
        assert_eq!(record.video_url, "https://x/y.mp4");
        assert_eq!(record.video_name, "a calm sea");
        assert_eq!(record.status, "completed");
        assert_eq!(record.user_id, user_id);

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM generated_videos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
