use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::services::analytics;
use crate::services::export::{render_csv, CSV_FILENAME};
use crate::services::store::SqliteStore;
use crate::state::AppState;

/// `json` returns the summary record, `csv` a downloadable report.
pub async fn download(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(format): Path<String>,
) -> AppResult<Response> {
    if format != "json" && format != "csv" {
        return Err(AppError::Validation(format!(
            "Unsupported export format '{}'",
            format
        )));
    }

    let summary = {
        let conn = state.db.get()?;
        let store = SqliteStore::new(&conn);
        analytics::export_summary(&store, current.id())?
    };
    info!(
        user_id = current.id(),
        format = %format,
        rows = summary.ledger.len(),
        "Export generated"
    );

    if format == "json" {
        return Ok(Json(summary).into_response());
    }

    let body = render_csv(&summary)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
