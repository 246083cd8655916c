use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::queries::expenses;
use crate::db::queries::transactions::TransactionFilter;
use crate::error::AppResult;
use crate::models::{Expense, ExpenseRequest};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Expense>>> {
    let conn = state.db.get()?;
    let filter = TransactionFilter::for_user(current.id());
    Ok(Json(expenses::list_expenses(&conn, &filter)?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ExpenseRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new_expense = req.validate()?;
    let conn = state.db.get()?;
    let id = expenses::create_expense(&conn, current.id(), &new_expense)?;
    info!(user_id = current.id(), expense_id = id, "Expense added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Expense added", "id": id })),
    ))
}

/// Deleting an id the user does not own is a no-op.
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    expenses::delete_expense(&conn, current.id(), id)?;
    Ok(Json(json!({ "message": "Deleted" })))
}
