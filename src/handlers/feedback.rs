use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::queries::feedback;
use crate::error::AppResult;
use crate::models::FeedbackRequest;
use crate::state::AppState;

pub async fn submit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<FeedbackRequest>,
) -> AppResult<Json<Value>> {
    let req = req.validate()?;
    let conn = state.db.get()?;
    feedback::create_feedback(&conn, &current.user.username, req.rating, &req.message)?;
    info!(user_id = current.id(), rating = req.rating, "Feedback received");
    Ok(Json(json!({ "message": "Feedback received" })))
}
