pub mod admin;
pub mod analytics;
pub mod budgets;
pub mod dashboard;
pub mod emergency_fund;
pub mod expenses;
pub mod export;
pub mod feedback;
pub mod incomes;
pub mod recurring;
pub mod user;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::auth;
use crate::date_utils::YearMonth;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// `?month=YYYY-MM`, defaulting to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

impl MonthParams {
    pub fn resolve(&self) -> AppResult<YearMonth> {
        match self.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            None => Ok(YearMonth::current()),
            Some(m) => m.parse().map_err(AppError::Validation),
        }
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        // Analytics
        .route("/dashboard", get(dashboard::summary))
        .route("/analytics/monthly", get(analytics::monthly))
        .route("/analytics/overall", get(analytics::overall))
        .route("/budget-analysis", get(budgets::analysis))
        // Transactions
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/:id", delete(expenses::delete))
        .route("/income", get(incomes::list).post(incomes::create))
        .route("/income/:id", delete(incomes::delete))
        // Planning
        .route("/budget", get(budgets::list).post(budgets::upsert))
        .route("/recurring", get(recurring::list).post(recurring::create))
        .route("/recurring/:id", delete(recurring::delete))
        .route(
            "/emergency-fund",
            get(emergency_fund::show).put(emergency_fund::update),
        )
        // Account
        .route("/user/profile", put(user::update_profile))
        .route("/user/password", put(user::change_password))
        .route("/feedback", post(feedback::submit))
        // Admin
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/feedback", get(admin::list_feedback))
        // Export
        .route("/export/:format", get(export::download))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/health", get(health))
        .merge(protected)
}

async fn health() -> &'static str {
    "OK"
}
