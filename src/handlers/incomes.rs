use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::queries::incomes;
use crate::db::queries::transactions::TransactionFilter;
use crate::error::AppResult;
use crate::models::{Income, IncomeRequest};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Income>>> {
    let conn = state.db.get()?;
    let filter = TransactionFilter::for_user(current.id());
    Ok(Json(incomes::list_incomes(&conn, &filter)?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<IncomeRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new_income = req.validate()?;
    let conn = state.db.get()?;
    let id = incomes::create_income(&conn, current.id(), &new_income)?;
    info!(user_id = current.id(), income_id = id, "Income added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Income added", "id": id })),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    incomes::delete_income(&conn, current.id(), id)?;
    Ok(Json(json!({ "message": "Deleted" })))
}
