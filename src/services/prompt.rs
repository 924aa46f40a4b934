//! Prompt validation for generation requests.
//!
//! Pure and deterministic; the error display strings double as the
//! user-facing rejection messages. No sanitization happens here — output
//! encoding is the consumer's problem.

pub const MAX_PROMPT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Please provide a valid text prompt")]
    Missing,
    #[error("Prompt cannot be empty")]
    Empty,
    #[error("Prompt must be less than 500 characters")]
    TooLong,
}

/// Validate the raw `userPrompt` field of a generation request.
///
/// Accepts the field straight out of the JSON body so an absent or
/// non-string value is rejected here rather than by the deserializer.
/// Length is counted in characters, not bytes, after trimming.
///
/// # Errors
///
/// Returns the specific [`PromptError`] the caller should surface as a 400.
pub fn validate(raw: Option<&serde_json::Value>) -> Result<String, PromptError> {
    let text = raw
        .and_then(serde_json::Value::as_str)
        .ok_or(PromptError::Missing)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PromptError::Empty);
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(PromptError::TooLong);
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
