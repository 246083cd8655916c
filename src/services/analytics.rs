//! Aggregation engine: dashboard summaries, month buckets, budget
//! comparisons and lifetime/export summaries.
//!
//! Every function here is a pure computation over rows read through a
//! [`TransactionStore`]. Nothing is cached or persisted; calling again with
//! the same rows yields the same result. Any ratio whose denominator is zero
//! is reported as 0.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::date_utils::{same_day_previous_month, short_label, YearMonth};
use crate::db::queries::transactions::TransactionFilter;
use crate::error::AppResult;
use crate::models::{money, Expense, Transaction, TransactionKind};
use crate::services::store::TransactionStore;

pub const RECENT_TRANSACTIONS: i64 = 5;
pub const TREND_MONTHS: i32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
    /// Share of the total, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub month: YearMonth,
    #[serde(rename = "total_income", serialize_with = "money::as_decimal")]
    pub total_income_cents: i64,
    #[serde(rename = "total_expenses", serialize_with = "money::as_decimal")]
    pub total_expenses_cents: i64,
    #[serde(rename = "net_savings", serialize_with = "money::as_decimal")]
    pub net_savings_cents: i64,
    pub savings_rate: f64,
    pub recent_transactions: Vec<Expense>,
    pub category_expenses: Vec<CategorySlice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    #[serde(rename = "income", serialize_with = "money::as_decimal")]
    pub income_cents: i64,
    #[serde(rename = "expenses", serialize_with = "money::as_decimal")]
    pub expense_cents: i64,
}

impl MonthBucket {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            income_cents: 0,
            expense_cents: 0,
        }
    }

    pub fn net_flow_cents(&self) -> i64 {
        self.income_cents - self.expense_cents
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Over,
    Under,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub category: String,
    #[serde(rename = "budgeted", serialize_with = "money::as_decimal")]
    pub budgeted_cents: i64,
    #[serde(rename = "actual", serialize_with = "money::as_decimal")]
    pub actual_cents: i64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthComparison {
    #[serde(rename = "this_month_val", serialize_with = "money::as_decimal")]
    pub this_month_cents: i64,
    #[serde(rename = "prev_month_val", serialize_with = "money::as_decimal")]
    pub prev_month_cents: i64,
    pub current_date: NaiveDate,
    pub prev_date: NaiveDate,
    pub current_date_label: String,
    pub prev_date_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAmount {
    pub month: YearMonth,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallAnalytics {
    #[serde(rename = "total_income", serialize_with = "money::as_decimal")]
    pub total_income_cents: i64,
    #[serde(rename = "total_expenses", serialize_with = "money::as_decimal")]
    pub total_expenses_cents: i64,
    #[serde(rename = "net_savings", serialize_with = "money::as_decimal")]
    pub net_savings_cents: i64,
    pub categories: Vec<CategorySlice>,
    pub comparison: MonthComparison,
    pub trend: Vec<MonthlyAmount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStatus {
    Saved,
    Overspent,
}

impl FlowStatus {
    pub fn label(self) -> &'static str {
        match self {
            FlowStatus::Saved => "Saved",
            FlowStatus::Overspent => "Overspent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub month: YearMonth,
    #[serde(rename = "income", serialize_with = "money::as_decimal")]
    pub income_cents: i64,
    #[serde(rename = "expense", serialize_with = "money::as_decimal")]
    pub expense_cents: i64,
    #[serde(rename = "net_flow", serialize_with = "money::as_decimal")]
    pub net_flow_cents: i64,
    pub status: FlowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_or_source: String,
    pub description: Option<String>,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
}

impl From<&Transaction> for LedgerEntry {
    fn from(t: &Transaction) -> Self {
        Self {
            date: t.date(),
            kind: t.kind(),
            category_or_source: t.category_or_source().to_string(),
            description: t.description().map(str::to_string),
            amount_cents: t.amount_cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    #[serde(rename = "total_income", serialize_with = "money::as_decimal")]
    pub total_income_cents: i64,
    #[serde(rename = "total_expenses", serialize_with = "money::as_decimal")]
    pub total_expenses_cents: i64,
    #[serde(rename = "net_savings", serialize_with = "money::as_decimal")]
    pub net_savings_cents: i64,
    pub savings_rate: f64,
    pub months: Vec<MonthlyFlow>,
    pub ledger: Vec<LedgerEntry>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / total * 100`, or 0 when `total` is 0.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Net savings as a percentage of income; 0 without income.
pub fn savings_rate(income_cents: i64, expense_cents: i64) -> f64 {
    percentage(income_cents - expense_cents, income_cents)
}

/// Slices sorted by amount descending (ties by name), each with its share of
/// the combined total.
pub fn category_slices(
    totals: impl IntoIterator<Item = (String, i64)>,
) -> AppResult<Vec<CategorySlice>> {
    let mut by_category: HashMap<String, i64> = HashMap::new();
    for (category, amount_cents) in totals {
        money::add_cents(by_category.entry(category).or_insert(0), amount_cents)?;
    }

    let total = money::checked_total(by_category.values().copied())?;

    let mut result: Vec<CategorySlice> = by_category
        .into_iter()
        .map(|(category, amount_cents)| CategorySlice {
            category,
            amount_cents,
            percentage: round1(percentage(amount_cents, total)),
        })
        .collect();

    result.sort_by(|a, b| {
        b.amount_cents
            .cmp(&a.amount_cents)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(result)
}

fn month_filter(user_id: i64, month: YearMonth) -> TransactionFilter {
    TransactionFilter::between(user_id, month.first_day(), month.last_day())
}

/// Totals and category breakdown for one month plus the latest expenses.
pub fn dashboard<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
    month: YearMonth,
) -> AppResult<DashboardSummary> {
    let filter = month_filter(user_id, month);
    let expenses = store.list(TransactionKind::Expense, &filter)?;
    let incomes = store.list(TransactionKind::Income, &filter)?;

    let total_income_cents = money::checked_total(incomes.iter().map(Transaction::amount_cents))?;
    let total_expenses_cents =
        money::checked_total(expenses.iter().map(Transaction::amount_cents))?;

    let category_expenses = if total_expenses_cents > 0 {
        category_slices(
            expenses
                .iter()
                .map(|e| (e.category_or_source().to_string(), e.amount_cents())),
        )?
    } else {
        Vec::new()
    };

    let recent_filter = TransactionFilter::for_user(user_id).with_limit(RECENT_TRANSACTIONS);
    let recent_transactions = store
        .list(TransactionKind::Expense, &recent_filter)?
        .into_iter()
        .filter_map(|t| match t {
            Transaction::Expense(e) => Some(e),
            Transaction::Income(_) => None,
        })
        .collect();

    debug!(
        user_id,
        month = %month,
        total_income_cents,
        total_expenses_cents,
        "Dashboard computed"
    );

    Ok(DashboardSummary {
        month,
        total_income_cents,
        total_expenses_cents,
        net_savings_cents: total_income_cents - total_expenses_cents,
        savings_rate: savings_rate(total_income_cents, total_expenses_cents),
        recent_transactions,
        category_expenses,
    })
}

/// Per-month income and expense sums for every month with data.
fn merged_buckets<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
) -> AppResult<BTreeMap<YearMonth, MonthBucket>> {
    let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();

    for (month, cents) in store.monthly_totals(user_id, TransactionKind::Income)? {
        let bucket = buckets
            .entry(month)
            .or_insert_with(|| MonthBucket::empty(month));
        money::add_cents(&mut bucket.income_cents, cents)?;
    }
    for (month, cents) in store.monthly_totals(user_id, TransactionKind::Expense)? {
        let bucket = buckets
            .entry(month)
            .or_insert_with(|| MonthBucket::empty(month));
        money::add_cents(&mut bucket.expense_cents, cents)?;
    }

    Ok(buckets)
}

/// Exactly [`TREND_MONTHS`] contiguous months, ascending, ending at the
/// latest month with data or at `today`'s month, whichever is later.
pub fn monthly_trend<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> AppResult<Vec<MonthBucket>> {
    let buckets = merged_buckets(store, user_id)?;
    let current = YearMonth::of(today);
    let anchor = buckets
        .keys()
        .next_back()
        .map_or(current, |latest| (*latest).max(current));

    let window = (0..TREND_MONTHS)
        .rev()
        .map(|back| anchor.shift(-back))
        .map(|month| {
            buckets
                .get(&month)
                .copied()
                .unwrap_or_else(|| MonthBucket::empty(month))
        })
        .collect();

    debug!(user_id, anchor = %anchor, months_with_data = buckets.len(), "Monthly trend computed");
    Ok(window)
}

/// Actual spend against each budget set for `month`. Categories without a
/// budget row are not reported.
pub fn budget_analysis<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
    month: YearMonth,
) -> AppResult<Vec<BudgetComparison>> {
    let filter = month_filter(user_id, month);
    let mut result = Vec::new();

    for budget in store.budgets(user_id, month)? {
        let actual_cents = store.sum(
            TransactionKind::Expense,
            &filter.clone().with_category(budget.category.clone()),
        )?;
        let status = if actual_cents > budget.amount_cents {
            BudgetStatus::Over
        } else {
            BudgetStatus::Under
        };
        result.push(BudgetComparison {
            category: budget.category,
            budgeted_cents: budget.amount_cents,
            actual_cents,
            status,
        });
    }

    Ok(result)
}

/// Spend from the 1st through `today` against the same span of the previous
/// month, the end clamped when the previous month is shorter.
pub fn month_over_month<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> AppResult<MonthComparison> {
    let this_month = YearMonth::of(today);
    let prev_date = same_day_previous_month(today);

    let this_month_cents = store.sum(
        TransactionKind::Expense,
        &TransactionFilter::between(user_id, this_month.first_day(), today),
    )?;
    let prev_month_cents = store.sum(
        TransactionKind::Expense,
        &TransactionFilter::between(user_id, this_month.prev().first_day(), prev_date),
    )?;

    Ok(MonthComparison {
        this_month_cents,
        prev_month_cents,
        current_date: today,
        prev_date,
        current_date_label: short_label(today),
        prev_date_label: short_label(prev_date),
    })
}

/// Lifetime totals, category shares, month-over-month comparison and the
/// full expense history per month.
pub fn overall_analytics<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> AppResult<OverallAnalytics> {
    let everything = TransactionFilter::for_user(user_id);
    let total_income_cents = store.sum(TransactionKind::Income, &everything)?;
    let total_expenses_cents = store.sum(TransactionKind::Expense, &everything)?;

    let categories = category_slices(store.category_totals(user_id)?)?;
    let comparison = month_over_month(store, user_id, today)?;
    let trend = store
        .monthly_totals(user_id, TransactionKind::Expense)?
        .into_iter()
        .map(|(month, amount_cents)| MonthlyAmount {
            month,
            amount_cents,
        })
        .collect();

    Ok(OverallAnalytics {
        total_income_cents,
        total_expenses_cents,
        net_savings_cents: total_income_cents - total_expenses_cents,
        categories,
        comparison,
        trend,
    })
}

/// Lifetime summary, per-month cash flow and the interleaved ledger that
/// feed the CSV and JSON exports.
pub fn export_summary<S: TransactionStore + ?Sized>(
    store: &S,
    user_id: i64,
) -> AppResult<ExportSummary> {
    let everything = TransactionFilter::for_user(user_id);
    let mut rows = store.list(TransactionKind::Income, &everything)?;
    rows.extend(store.list(TransactionKind::Expense, &everything)?);

    let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();
    for row in &rows {
        let month = YearMonth::of(row.date());
        let bucket = buckets
            .entry(month)
            .or_insert_with(|| MonthBucket::empty(month));
        let total = match row.kind() {
            TransactionKind::Income => &mut bucket.income_cents,
            TransactionKind::Expense => &mut bucket.expense_cents,
        };
        money::add_cents(total, row.amount_cents())?;
    }

    let total_income_cents = money::checked_total(buckets.values().map(|b| b.income_cents))?;
    let total_expenses_cents = money::checked_total(buckets.values().map(|b| b.expense_cents))?;

    let months = buckets
        .values()
        .map(|b| {
            let net_flow_cents = b.net_flow_cents();
            MonthlyFlow {
                month: b.month,
                income_cents: b.income_cents,
                expense_cents: b.expense_cents,
                net_flow_cents,
                status: if net_flow_cents >= 0 {
                    FlowStatus::Saved
                } else {
                    FlowStatus::Overspent
                },
            }
        })
        .collect();

    // Stable sort: same-day rows keep incomes ahead of expenses.
    rows.sort_by(|a, b| b.date().cmp(&a.date()));
    let ledger = rows.iter().map(LedgerEntry::from).collect();

    Ok(ExportSummary {
        total_income_cents,
        total_expenses_cents,
        net_savings_cents: total_income_cents - total_expenses_cents,
        savings_rate: savings_rate(total_income_cents, total_expenses_cents),
        months,
        ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::store::memory::MemoryStore;

    const USER: i64 = 1;
    const OTHER: i64 = 2;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_dashboard_example_month() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2024-03-05", 100_000, "Salary")
            .expense(USER, "2024-03-10", 60_000, "Food");

        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();

        assert_eq!(summary.total_income_cents, 100_000);
        assert_eq!(summary.total_expenses_cents, 60_000);
        assert_eq!(summary.net_savings_cents, 40_000);
        assert_eq!(summary.savings_rate, 40.0);
        assert_eq!(
            summary.category_expenses,
            vec![CategorySlice {
                category: "Food".into(),
                amount_cents: 60_000,
                percentage: 100.0,
            }]
        );
    }

    #[test]
    fn test_dashboard_empty_month_is_all_zero() {
        let store = MemoryStore::new();
        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();

        assert_eq!(summary.total_income_cents, 0);
        assert_eq!(summary.total_expenses_cents, 0);
        assert_eq!(summary.net_savings_cents, 0);
        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.category_expenses.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }

    #[test]
    fn test_dashboard_spend_without_income_has_zero_rate() {
        let mut store = MemoryStore::new();
        store.expense(USER, "2024-03-10", 5_000, "Food");

        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();
        assert_eq!(summary.net_savings_cents, -5_000);
        assert_eq!(summary.savings_rate, 0.0);
    }

    #[test]
    fn test_dashboard_recent_ignores_month_filter() {
        let mut store = MemoryStore::new();
        for day in 1..=7 {
            store.expense(USER, &format!("2024-01-{:02}", day), 100, "Misc");
        }
        store.expense(OTHER, "2024-12-31", 100, "Misc");

        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();
        let dates: Vec<NaiveDate> = summary.recent_transactions.iter().map(|e| e.date).collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], date("2024-01-07"));
        assert_eq!(dates[4], date("2024-01-03"));
        assert_eq!(summary.total_expenses_cents, 0);
    }

    #[test]
    fn test_dashboard_excludes_neighbouring_months() {
        let mut store = MemoryStore::new();
        store
            .expense(USER, "2024-02-29", 1_000, "Food")
            .expense(USER, "2024-03-01", 2_000, "Food")
            .expense(USER, "2024-03-31", 3_000, "Rent")
            .expense(USER, "2024-04-01", 4_000, "Food");

        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();
        assert_eq!(summary.total_expenses_cents, 5_000);
    }

    #[test]
    fn test_dashboard_total_out_of_range_is_an_error() {
        let mut store = MemoryStore::new();
        store
            .expense(USER, "2024-03-01", i64::MAX / 2 + 1, "Food")
            .expense(USER, "2024-03-02", i64::MAX / 2 + 1, "Rent");

        assert!(matches!(
            dashboard(&store, USER, ym("2024-03")),
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            export_summary(&store, USER),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_category_percentages_sum_to_hundred() {
        let slices = category_slices(vec![
            ("Food".to_string(), 100),
            ("Rent".to_string(), 100),
            ("Fun".to_string(), 100),
            ("Food".to_string(), 50),
        ])
        .unwrap();

        assert_eq!(slices[0].category, "Food");
        assert_eq!(slices[0].amount_cents, 150);
        let sum: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.2, "sum was {}", sum);
    }

    #[test]
    fn test_category_slices_zero_total() {
        let slices = category_slices(vec![("Food".to_string(), 0)]).unwrap();
        assert_eq!(slices[0].percentage, 0.0);
    }

    #[test]
    fn test_trend_without_data_ends_now() {
        let store = MemoryStore::new();
        let trend = monthly_trend(&store, USER, date("2024-03-15")).unwrap();

        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].month, ym("2023-04"));
        assert_eq!(trend[11].month, ym("2024-03"));
        assert!(trend
            .iter()
            .all(|b| b.income_cents == 0 && b.expense_cents == 0));
    }

    #[test]
    fn test_trend_is_contiguous_and_fills_gaps() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2023-11-02", 10_000, "Salary")
            .expense(USER, "2024-01-20", 2_500, "Food")
            .expense(USER, "2024-01-21", 500, "Food");

        let trend = monthly_trend(&store, USER, date("2024-01-25")).unwrap();

        assert_eq!(trend.len(), 12);
        for pair in trend.windows(2) {
            assert_eq!(pair[0].month.shift(1), pair[1].month);
        }
        let jan = trend.iter().find(|b| b.month == ym("2024-01")).unwrap();
        assert_eq!(jan.expense_cents, 3_000);
        assert_eq!(jan.income_cents, 0);
        let nov = trend.iter().find(|b| b.month == ym("2023-11")).unwrap();
        assert_eq!(nov.income_cents, 10_000);
        let dec = trend.iter().find(|b| b.month == ym("2023-12")).unwrap();
        assert_eq!((dec.income_cents, dec.expense_cents), (0, 0));
    }

    #[test]
    fn test_trend_stale_data_anchors_on_current_month() {
        let mut store = MemoryStore::new();
        store.expense(USER, "2020-06-01", 1_000, "Food");

        let trend = monthly_trend(&store, USER, date("2024-03-15")).unwrap();
        assert_eq!(trend.last().unwrap().month, ym("2024-03"));
        assert!(trend.iter().all(|b| b.expense_cents == 0));
    }

    #[test]
    fn test_trend_future_data_anchors_on_latest_month() {
        let mut store = MemoryStore::new();
        store.expense(USER, "2024-06-01", 1_000, "Rent");

        let trend = monthly_trend(&store, USER, date("2024-03-15")).unwrap();
        assert_eq!(trend.last().unwrap().month, ym("2024-06"));
        assert_eq!(trend.first().unwrap().month, ym("2023-07"));
    }

    #[test]
    fn test_budget_status_boundaries() {
        let mut store = MemoryStore::new();
        store
            .budget(USER, "2024-03", "Food", 10_000)
            .budget(USER, "2024-03", "Rent", 50_000)
            .budget(USER, "2024-03", "Fun", 2_000)
            .expense(USER, "2024-03-03", 10_000, "Food")
            .expense(USER, "2024-03-04", 50_001, "Rent")
            .expense(USER, "2024-02-04", 9_999, "Fun");

        let analysis = budget_analysis(&store, USER, ym("2024-03")).unwrap();
        let status = |cat: &str| analysis.iter().find(|b| b.category == cat).unwrap().status;

        assert_eq!(status("Food"), BudgetStatus::Under);
        assert_eq!(status("Rent"), BudgetStatus::Over);
        assert_eq!(status("Fun"), BudgetStatus::Under);
    }

    #[test]
    fn test_budget_analysis_omits_unbudgeted_categories() {
        let mut store = MemoryStore::new();
        store
            .budget(USER, "2024-03", "Food", 10_000)
            .expense(USER, "2024-03-03", 5_000, "Travel");

        let analysis = budget_analysis(&store, USER, ym("2024-03")).unwrap();
        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].category, "Food");
        assert_eq!(analysis[0].actual_cents, 0);
        assert!(analysis.iter().all(|b| b.category != "Travel"));
    }

    #[test]
    fn test_month_over_month_clamps_to_leap_day() {
        let mut store = MemoryStore::new();
        store
            .expense(USER, "2024-02-01", 1_000, "Food")
            .expense(USER, "2024-02-29", 2_000, "Food")
            .expense(USER, "2024-03-31", 4_000, "Food")
            .expense(USER, "2024-01-31", 8_000, "Food");

        let cmp = month_over_month(&store, USER, date("2024-03-31")).unwrap();
        assert_eq!(cmp.prev_date, date("2024-02-29"));
        assert_eq!(cmp.prev_month_cents, 3_000);
        assert_eq!(cmp.this_month_cents, 4_000);
        assert_eq!(cmp.current_date_label, "Mar 31");
        assert_eq!(cmp.prev_date_label, "Feb 29");
    }

    #[test]
    fn test_month_over_month_same_elapsed_days() {
        let mut store = MemoryStore::new();
        store
            .expense(USER, "2024-04-10", 1_000, "Food")
            .expense(USER, "2024-04-16", 2_000, "Food")
            .expense(USER, "2024-05-15", 500, "Food")
            .expense(USER, "2024-05-16", 700, "Food");

        let cmp = month_over_month(&store, USER, date("2024-05-15")).unwrap();
        assert_eq!(cmp.this_month_cents, 500);
        assert_eq!(cmp.prev_month_cents, 1_000);
    }

    #[test]
    fn test_overall_analytics() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2024-01-05", 200_000, "Salary")
            .expense(USER, "2024-01-10", 30_000, "Food")
            .expense(USER, "2024-02-10", 90_000, "Rent")
            .expense(OTHER, "2024-02-10", 1_000_000, "Rent");

        let overall = overall_analytics(&store, USER, date("2024-02-20")).unwrap();

        assert_eq!(overall.total_income_cents, 200_000);
        assert_eq!(overall.total_expenses_cents, 120_000);
        assert_eq!(overall.net_savings_cents, 80_000);
        assert_eq!(overall.categories[0].category, "Rent");
        assert_eq!(overall.categories[0].percentage, 75.0);
        assert_eq!(overall.categories[1].percentage, 25.0);
        assert_eq!(
            overall.trend,
            vec![
                MonthlyAmount {
                    month: ym("2024-01"),
                    amount_cents: 30_000
                },
                MonthlyAmount {
                    month: ym("2024-02"),
                    amount_cents: 90_000
                },
            ]
        );
    }

    #[test]
    fn test_export_summary_months_and_ledger() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2024-01-01", 100_000, "Salary")
            .expense(USER, "2024-01-15", 40_000, "Rent")
            .expense(USER, "2024-02-03", 20_000, "Food")
            .income(USER, "2024-02-03", 5_000, "Refund");

        let export = export_summary(&store, USER).unwrap();

        assert_eq!(export.total_income_cents, 105_000);
        assert_eq!(export.total_expenses_cents, 60_000);
        assert_eq!(export.net_savings_cents, 45_000);
        assert!((export.savings_rate - 42.857).abs() < 0.01);

        assert_eq!(export.months.len(), 2);
        assert_eq!(export.months[0].month, ym("2024-01"));
        assert_eq!(export.months[0].status, FlowStatus::Saved);
        assert_eq!(export.months[1].net_flow_cents, -15_000);
        assert_eq!(export.months[1].status, FlowStatus::Overspent);

        let kinds: Vec<TransactionKind> = export.ledger.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Income,
                TransactionKind::Expense,
                TransactionKind::Expense,
                TransactionKind::Income,
            ]
        );
        assert_eq!(export.ledger[0].category_or_source, "Refund");
        assert_eq!(export.ledger[3].date, date("2024-01-01"));
    }

    #[test]
    fn test_export_break_even_month_counts_as_saved() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2024-05-01", 1_000, "Gift")
            .expense(USER, "2024-05-02", 1_000, "Food");

        let export = export_summary(&store, USER).unwrap();
        assert_eq!(export.months[0].net_flow_cents, 0);
        assert_eq!(export.months[0].status, FlowStatus::Saved);
    }

    #[test]
    fn test_summary_serializes_decimal_amounts() {
        let mut store = MemoryStore::new();
        store
            .income(USER, "2024-03-05", 100_000, "Salary")
            .expense(USER, "2024-03-10", 60_000, "Food");

        let summary = dashboard(&store, USER, ym("2024-03")).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_income"], 1000.0);
        assert_eq!(json["net_savings"], 400.0);
        assert_eq!(json["month"], "2024-03");
        assert_eq!(json["category_expenses"][0]["percentage"], 100.0);
    }
}
