use axum::extract::State;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::date_utils::today;
use crate::error::AppResult;
use crate::services::analytics::{self, MonthBucket, OverallAnalytics};
use crate::services::store::SqliteStore;
use crate::state::AppState;

/// Rolling twelve-month income/expense series.
pub async fn monthly(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<MonthBucket>>> {
    let conn = state.db.get()?;
    let store = SqliteStore::new(&conn);

    Ok(Json(analytics::monthly_trend(&store, current.id(), today())?))
}

pub async fn overall(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<OverallAnalytics>> {
    let conn = state.db.get()?;
    let store = SqliteStore::new(&conn);

    Ok(Json(analytics::overall_analytics(
        &store,
        current.id(),
        today(),
    )?))
}
