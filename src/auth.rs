//! Authentication middleware and handlers.
//!
//! Passwords are stored as Argon2 hashes. Bearer tokens and password-reset
//! tokens are random UUIDs held server-side in SQLite with an expiry, so they
//! survive restarts and can be revoked individually or per user.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries::{emergency_funds, sessions, users};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::notify::Notification;
use crate::state::AppState;

pub const DEFAULT_USER_TYPE: &str = "individual";

const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated user, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.user.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Unauthorized".into()))
        }
    }
}

fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a live bearer token; otherwise attaches the
/// [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized("Token is missing!".into()).into_response();
    };

    let user = {
        let conn = match state.db.get() {
            Ok(conn) => conn,
            Err(e) => return AppError::from(e).into_response(),
        };
        match sessions::find_session_user(&conn, &token) {
            Ok(user) => user,
            Err(e) => return AppError::from(e).into_response(),
        }
    };

    match user {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser { user, token });
            next.run(request).await
        }
        None => AppError::Unauthorized("Token is invalid!".into()).into_response(),
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::error!("Invalid password hash format in database");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub(crate) fn validate_new_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// A write that lost the race for a username or email gets the same 400 as
/// the upfront check.
pub fn duplicate_user_error(err: rusqlite::Error, suffix: &str) -> AppError {
    match users::unique_violation_column(&err) {
        Some("username") => AppError::Validation(format!("Username {}", suffix)),
        Some("email") => AppError::Validation(format!("Email {}", suffix)),
        _ => AppError::from(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_type: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    if username.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "Username and email are required".into(),
        ));
    }
    validate_new_password(&req.password)?;

    let conn = state.db.get()?;
    if users::username_taken(&conn, &username, None)? {
        return Err(AppError::Validation("Username already exists".into()));
    }
    if users::email_taken(&conn, &email, None)? {
        return Err(AppError::Validation("Email already exists".into()));
    }

    let new_user = NewUser {
        username,
        email,
        password_hash: hash_password(&req.password)?,
        user_type: req
            .user_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_TYPE.into()),
    };

    let tx = conn.unchecked_transaction()?;
    let user_id = users::create_user(&tx, &new_user)
        .map_err(|e| duplicate_user_error(e, "already exists"))?;
    emergency_funds::ensure_fund(&tx, user_id)?;
    tx.commit()?;

    info!(user_id, username = %new_user.username, "User registered");
    state
        .notifier
        .send(Notification::welcome(&new_user.email, &new_user.username));

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access_token: String,
    pub username: String,
    pub email: String,
    pub user_type: String,
    pub is_admin: bool,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let conn = state.db.get()?;

    let user = users::find_by_username(&conn, req.username.trim())?
        .filter(|u| verify_password(&req.password, &u.password_hash));

    let Some(user) = user else {
        warn!(username = %req.username, "Failed login attempt");
        return Err(AppError::Unauthorized("Invalid username or password".into()));
    };

    let token = Uuid::new_v4().to_string();
    sessions::create_session(&conn, &token, user.id, state.config.session_ttl_days)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful",
        access_token: token,
        username: user.username,
        email: user.email,
        user_type: user.user_type,
        is_admin: user.is_admin,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    sessions::delete_session(&conn, &current.token)?;
    info!(user_id = current.id(), "User logged out");
    Ok(Json(json!({ "message": "Logged out" })))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Always answers with the same message so the endpoint cannot be used to
/// probe for registered addresses.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    sessions::purge_expired(&conn)?;

    if let Some(user) = users::find_by_email(&conn, req.email.trim())? {
        let token = Uuid::new_v4().to_string();
        let ttl = state.config.reset_ttl_minutes;
        sessions::create_password_reset(&conn, &token, user.id, ttl)?;

        let link = format!("{}?reset_token={}", state.config.frontend_url, token);
        state
            .notifier
            .send(Notification::password_reset(&user.email, &link, ttl));
        info!(user_id = user.id, "Password reset requested");
    }

    Ok(Json(json!({
        "message": "If registered, you will receive a reset link."
    })))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    validate_new_password(&req.new_password)?;

    let conn = state.db.get()?;
    let tx = conn.unchecked_transaction()?;
    let user = match sessions::take_password_reset(&tx, &req.token)? {
        Some(user_id) => users::get_user(&tx, user_id)?,
        None => None,
    };
    let Some(user) = user else {
        tx.commit()?;
        return Err(AppError::Validation("Invalid token".into()));
    };

    users::update_password_hash(&tx, user.id, &hash_password(&req.new_password)?)?;
    sessions::delete_user_sessions(&tx, user.id)?;
    tx.commit()?;

    info!(user_id = user.id, "Password reset completed");
    state
        .notifier
        .send(Notification::password_changed(&user.email, &user.username));

    Ok(Json(json!({ "message": "Password reset successful" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(validate_new_password("abc").is_err());
        assert!(validate_new_password("abcdef").is_ok());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc-123"));

        let basic = Request::builder()
            .header(header::AUTHORIZATION, "Basic Zm9v")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&basic), None);

        let empty = Request::builder()
            .header(header::AUTHORIZATION, "Bearer ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&empty), None);
    }
}
