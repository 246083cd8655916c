use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::db::queries::recurring;
use crate::error::AppResult;
use crate::models::{RecurringExpense, RecurringRequest};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<RecurringExpense>>> {
    let conn = state.db.get()?;
    Ok(Json(recurring::list_recurring(&conn, current.id())?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RecurringRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let item = req.validate()?;
    let conn = state.db.get()?;
    let id = recurring::create_recurring(&conn, current.id(), &item)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Added", "id": id })),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    recurring::delete_recurring(&conn, current.id(), id)?;
    Ok(Json(json!({ "message": "Deleted" })))
}
