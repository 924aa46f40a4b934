//! Generation orchestration: validate → external call → persist.
//!
//! ERROR HANDLING
//! ==============
//! Each stage short-circuits with a typed error; the route layer is the
//! only place these become HTTP responses. The external call and the store
//! write are not transactional: if the write fails after a successful
//! generation, the asset URL is lost to the user. That gap is accepted and
//! logged at error severity so it stays operationally visible. No stage
//! retries; the user resubmits explicitly.

use tracing::{error, info};
use uuid::Uuid;

use crate::gooey::GooeyError;
use crate::services::{prompt, video};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidPrompt(#[from] prompt::PromptError),
    #[error("generation service failed: {0}")]
    ExternalApi(GooeyError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Run one generation request end to end. Rate limiting happens at the
/// route boundary before this is ever invoked.
pub async fn handle_prompt(
    state: &AppState,
    user_id: Uuid,
    raw_prompt: Option<&serde_json::Value>,
) -> Result<video::VideoRow, GenerateError> {
    let prompt_text = prompt::validate(raw_prompt)?;
    info!(%user_id, prompt_chars = prompt_text.chars().count(), "generating video");

    let outcome = match state.gooey.generate(&prompt_text).await {
        Ok(outcome) => outcome,
        Err(e @ (GooeyError::Api { .. } | GooeyError::Request(_))) => {
            // Upstream status stays in the log; the client sees a generic 502.
            error!(error = %e, %user_id, "generation service call failed");
            return Err(GenerateError::ExternalApi(e));
        }
        Err(e) => {
            error!(error = %e, %user_id, "generation returned an unusable response");
            return Err(GenerateError::Internal(e.to_string()));
        }
    };

    let record = match video::create_video(&state.pool, user_id, &outcome.video_url, &prompt_text).await {
        Ok(record) => record,
        Err(e) => {
            // The external side effect already happened and is not rolled
            // back; the generated asset is unreachable for the user.
            error!(
                error = %e,
                %user_id,
                video_url = %outcome.video_url,
                external_id = outcome.external_id.as_deref().unwrap_or("-"),
                "video generated but persisting the record failed"
            );
            return Err(GenerateError::Internal("failed to persist generated video".into()));
        }
    };

    info!(%user_id, video_id = %record.id, "video generated");
    Ok(record)
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
