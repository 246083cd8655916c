use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::db::queries::emergency_funds;
use crate::error::AppResult;
use crate::models::{EmergencyFundSummary, EmergencyFundUpdate};
use crate::state::AppState;

pub async fn show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<EmergencyFundSummary>> {
    let conn = state.db.get()?;
    let fund = emergency_funds::get_or_create_fund(&conn, current.id())?;
    Ok(Json(fund.summary()))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(update): Json<EmergencyFundUpdate>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    let mut fund = emergency_funds::get_or_create_fund(&conn, current.id())?;
    update.apply(&mut fund)?;
    emergency_funds::save_fund(&conn, current.id(), &fund)?;
    Ok(Json(json!({ "message": "Fund updated" })))
}
