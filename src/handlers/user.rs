use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{
    duplicate_user_error, hash_password, validate_new_password, verify_password, CurrentUser,
};
use crate::db::queries::users;
use crate::error::{AppError, AppResult};
use crate::notify::Notification;
use crate::state::AppState;

/// Partial profile update; absent or blank fields keep their value.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<String>,
}

fn pick(new: Option<String>, current: &str) -> String {
    new.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| current.to_string())
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<Value>> {
    let user = &current.user;
    let username = pick(update.username, &user.username);
    let email = pick(update.email, &user.email);
    let user_type = pick(update.user_type, &user.user_type);

    let conn = state.db.get()?;
    if username != user.username && users::username_taken(&conn, &username, Some(user.id))? {
        return Err(AppError::Validation("Username taken".into()));
    }
    if email != user.email && users::email_taken(&conn, &email, Some(user.id))? {
        return Err(AppError::Validation("Email taken".into()));
    }

    users::update_profile(&conn, user.id, &username, &email, &user_type)
        .map_err(|e| duplicate_user_error(e, "taken"))?;
    info!(user_id = user.id, "Profile updated");
    Ok(Json(json!({ "message": "Profile updated" })))
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<PasswordChange>,
) -> AppResult<Json<Value>> {
    let user = &current.user;
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(AppError::Unauthorized("Incorrect current password".into()));
    }
    validate_new_password(&req.new_password)?;

    let conn = state.db.get()?;
    users::update_password_hash(&conn, user.id, &hash_password(&req.new_password)?)?;
    info!(user_id = user.id, "Password changed");

    state
        .notifier
        .send(Notification::password_changed(&user.email, &user.username));
    Ok(Json(json!({ "message": "Password updated" })))
}
