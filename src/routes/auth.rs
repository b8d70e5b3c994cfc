//! Auth routes: registration, login, logout, and the session extractor.

use axum::extract::{FromRef, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use uuid::Uuid;

use crate::config::env_bool;
use crate::services::auth::{self as auth_svc, AuthError, RegisterInput};
use crate::services::session::{self, SessionUser};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
const SESSION_MAX_AGE_DAYS: i64 = 30;

pub(crate) fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token })
    }
}

/// Session token from the request cookies, if any.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// ERRORS
// =============================================================================

/// Map an auth failure to a status and a message the sign-in form can show.
pub(crate) fn auth_error_to_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidEmail | AuthError::PasswordTooShort | AuthError::PasswordMismatch => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        AuthError::EmailTaken => (StatusCode::CONFLICT, err.to_string()),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthError::Hash(_) | AuthError::ShareCodeExhausted | AuthError::Db(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again.".to_owned())
        }
    }
}

fn auth_failure(err: AuthError) -> Response {
    let (status, message) = auth_error_to_response(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "auth request failed");
    }
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn start_session(state: &AppState, user_id: Uuid, status: StatusCode) -> Response {
    let token = match session::create_session(&state.pool, user_id).await {
        Ok(t) => t,
        Err(e) => return auth_failure(AuthError::Db(e)),
    };
    let user = match session::validate_session(&state.pool, &token).await {
        Ok(Some(user)) => user,
        Ok(None) => return auth_failure(AuthError::InvalidCredentials),
        Err(e) => return auth_failure(AuthError::Db(e)),
    };

    let jar = CookieJar::new().add(session_cookie(token));
    (status, jar, Json(user)).into_response()
}

/// `POST /api/auth/register` — create an account and sign in.
pub async fn register(State(state): State<AppState>, Json(body): Json<RegisterInput>) -> Response {
    match auth_svc::register(&state.pool, &body).await {
        Ok(user_id) => start_session(&state, user_id, StatusCode::CREATED).await,
        Err(e) => auth_failure(e),
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — verify credentials, set the session cookie.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    match auth_svc::login(&state.pool, &body.email, &body.password).await {
        Ok(user_id) => start_session(&state, user_id, StatusCode::OK).await,
        Err(e) => auth_failure(e),
    }
}

/// `GET /api/auth/me` — return current user.
pub async fn me(auth: AuthUser) -> Json<SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout` — delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "session delete failed");
    }
    let jar = CookieJar::new().add(cleared_session_cookie());
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
