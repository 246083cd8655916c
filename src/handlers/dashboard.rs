use axum::extract::{Query, State};
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::handlers::MonthParams;
use crate::services::analytics::{self, DashboardSummary};
use crate::services::store::SqliteStore;
use crate::state::AppState;

pub async fn summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<DashboardSummary>> {
    let month = params.resolve()?;
    let conn = state.db.get()?;
    let store = SqliteStore::new(&conn);

    Ok(Json(analytics::dashboard(&store, current.id(), month)?))
}
