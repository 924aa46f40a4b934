//! Auth routes — signup, login, logout, profile.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::services::auth::{self as auth_svc, AuthError};
use crate::services::session;
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(failure(StatusCode::UNAUTHORIZED, "Please log in to continue"));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session validation failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            })?
            .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Please log in to continue"))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct SignupBody {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/signup` — create an account and log straight in.
pub async fn signup(State(state): State<AppState>, jar: CookieJar, Json(body): Json<SignupBody>) -> Response {
    if body.password.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Password is required");
    }

    let user = match auth_svc::signup(&state.pool, &body.name, &body.email, &body.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidEmail) => {
            return failure(StatusCode::BAD_REQUEST, "Please provide a valid email address");
        }
        Err(AuthError::EmailTaken) => return failure(StatusCode::CONFLICT, "Email already exists"),
        Err(e) => {
            tracing::error!(error = %e, "signup failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create account");
        }
    };

    start_session(&state, jar, user).await
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — verify credentials, set the session cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(body): Json<LoginBody>) -> Response {
    let user = match auth_svc::verify_credentials(&state.pool, &body.email, &body.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidEmail | AuthError::InvalidCredentials) => {
            return failure(StatusCode::UNAUTHORIZED, "Either email or password is incorrect");
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
        }
    };

    start_session(&state, jar, user).await
}

async fn start_session(state: &AppState, jar: CookieJar, user: session::SessionUser) -> Response {
    let token = match session::create_session(&state.pool, user.id).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
        }
    };

    tracing::info!(user_id = %user.id, "session started");
    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    (
        jar,
        Json(json!({
            "success": true,
            "message": format!("Welcome {}", user.name),
            "user": user,
        })),
    )
        .into_response()
}

/// `POST /api/auth/logout` — delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Response {
    let _ = session::delete_session(&state.pool, &auth.token).await;

    let jar = CookieJar::new().add(clear_session_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// `GET /api/auth/me` — return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

#[derive(Deserialize)]
pub struct UpdateProfileBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// `PATCH /api/auth/profile` — update name/email, optionally rotate the
/// password (requires a matching confirmation).
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileBody>,
) -> Response {
    let new_password = body.password.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(pass) = new_password {
        if body.confirm_password.as_deref().map(str::trim) != Some(pass) {
            return failure(StatusCode::BAD_REQUEST, "Passwords do not match");
        }
    }

    match auth_svc::update_profile(
        &state.pool,
        auth.user.id,
        body.name.as_deref(),
        body.email.as_deref(),
        new_password,
    )
    .await
    {
        Ok(user) => Json(json!({
            "success": true,
            "message": "Profile updated successfully",
            "user": user,
        }))
        .into_response(),
        Err(AuthError::InvalidEmail) => failure(StatusCode::BAD_REQUEST, "Please provide a valid email address"),
        Err(AuthError::EmailTaken) => failure(StatusCode::CONFLICT, "Email already exists"),
        Err(e) => {
            tracing::error!(error = %e, user_id = %auth.user.id, "profile update failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error updating profile")
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
