use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::queries::budgets;
use crate::error::AppResult;
use crate::handlers::MonthParams;
use crate::models::{Budget, BudgetRequest};
use crate::services::analytics::{self, BudgetComparison};
use crate::services::store::SqliteStore;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<Vec<Budget>>> {
    let month = params.resolve()?;
    let conn = state.db.get()?;
    Ok(Json(budgets::list_budgets(&conn, current.id(), month)?))
}

/// Insert or replace the budget for (category, month).
pub async fn upsert(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<BudgetRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let budget = req.validate()?;
    let conn = state.db.get()?;
    budgets::upsert_budget(&conn, current.id(), &budget)?;
    info!(
        user_id = current.id(),
        category = %budget.category,
        month = %budget.month,
        "Budget set"
    );

    Ok((StatusCode::CREATED, Json(json!({ "message": "Budget set" }))))
}

pub async fn analysis(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<Vec<BudgetComparison>>> {
    let month = params.resolve()?;
    let conn = state.db.get()?;
    let store = SqliteStore::new(&conn);

    Ok(Json(analytics::budget_analysis(&store, current.id(), month)?))
}
