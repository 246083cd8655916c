//! Read-only admin views. Every handler answers 403 for non-admins.

use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::db::queries::{expenses, feedback, users};
use crate::error::AppResult;
use crate::models::{money, Feedback, User};
use crate::state::AppState;

const ADMIN_PAGE_SIZE: i64 = 20;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    #[serde(rename = "total_volume", serialize_with = "money::as_decimal")]
    pub total_volume_cents: i64,
    pub total_feedback: i64,
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AdminStats>> {
    current.require_admin()?;
    let conn = state.db.get()?;

    Ok(Json(AdminStats {
        total_users: users::count_users(&conn)?,
        total_volume_cents: expenses::total_volume(&conn)?,
        total_feedback: feedback::count_feedback(&conn)?,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<User>>> {
    current.require_admin()?;
    let conn = state.db.get()?;
    Ok(Json(users::list_users(&conn, ADMIN_PAGE_SIZE)?))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Feedback>>> {
    current.require_admin()?;
    let conn = state.db.get()?;
    Ok(Json(feedback::list_feedback(&conn, ADMIN_PAGE_SIZE)?))
}
