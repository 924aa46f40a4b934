//! Account service — signup, credential checks, profile updates.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::password;
use super::session::SessionUser;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password error: {0}")]
    Password(#[from] password::PasswordError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

fn name_or_email_local(name: &str, email: &str) -> String {
    let trimmed = name.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    email.split('@').next().unwrap_or("user").to_owned()
}

/// Create an account and return the new user. A duplicate email maps to
/// [`AuthError::EmailTaken`] rather than a database error.
pub async fn signup(pool: &PgPool, name: &str, email: &str, pass: &str) -> Result<SessionUser, AuthError> {
    let normalized = normalize_email(email).ok_or(AuthError::InvalidEmail)?;
    let display_name = name_or_email_local(name, &normalized);
    let password_hash = password::hash_password(pass)?;

    let row = sqlx::query(
        r"INSERT INTO users (email, name, password_hash)
          VALUES ($1, $2, $3)
          ON CONFLICT (email) DO NOTHING
          RETURNING id, name, email",
    )
    .bind(&normalized)
    .bind(&display_name)
    .bind(&password_hash)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or(AuthError::EmailTaken)?;
    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

/// Check a login attempt. Unknown email and wrong password produce the
/// same error so callers cannot probe which accounts exist.
pub async fn verify_credentials(pool: &PgPool, email: &str, pass: &str) -> Result<SessionUser, AuthError> {
    let normalized = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE email = $1")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Err(AuthError::InvalidCredentials);
    };

    let stored_hash: String = row.get("password_hash");
    if !password::verify_password(pass, &stored_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

/// Apply a partial profile update. `None` fields are left untouched; a new
/// password arrives already confirmed by the route layer.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    new_password: Option<&str>,
) -> Result<SessionUser, AuthError> {
    let normalized_email = match email {
        Some(raw) => Some(normalize_email(raw).ok_or(AuthError::InvalidEmail)?),
        None => None,
    };
    let password_hash = match new_password {
        Some(pass) => Some(password::hash_password(pass)?),
        None => None,
    };
    let trimmed_name = name.map(str::trim).filter(|n| !n.is_empty());

    let row = sqlx::query(
        r"UPDATE users
          SET name = COALESCE($2, name),
              email = COALESCE($3, email),
              password_hash = COALESCE($4, password_hash)
          WHERE id = $1
          RETURNING id, name, email",
    )
    .bind(user_id)
    .bind(trimmed_name)
    .bind(normalized_email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailTaken,
        _ => AuthError::Db(e),
    })?;

    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
