use super::*;
use axum::http::header::COOKIE;
use axum::http::HeaderValue;

// =============================================================================
// auth_error_to_response
// =============================================================================

#[test]
fn validation_errors_are_bad_request_with_message() {
    let (status, message) = auth_error_to_response(&AuthError::PasswordMismatch);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "passwords do not match");
}

#[test]
fn duplicate_email_is_conflict() {
    assert_eq!(auth_error_to_response(&AuthError::EmailTaken).0, StatusCode::CONFLICT);
}

#[test]
fn bad_credentials_are_unauthorized() {
    let (status, message) = auth_error_to_response(&AuthError::InvalidCredentials);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(message, "Failed to authenticate.");
}

#[test]
fn internal_errors_hide_details() {
    let (status, message) = auth_error_to_response(&AuthError::Hash("argon2 exploded".into()));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!message.contains("argon2"));
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_token_reads_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("theme=dark; session_token=abc123"));
    assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
}

#[test]
fn session_token_missing_or_empty_is_none() {
    assert!(session_token(&HeaderMap::new()).is_none());
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("session_token="));
    assert!(session_token(&headers).is_none());
}

#[test]
fn session_cookie_is_http_only_and_scoped_to_root() {
    let cookie = session_cookie("tok".into());
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[test]
fn cleared_cookie_expires_immediately() {
    let cookie = cleared_session_cookie();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}
