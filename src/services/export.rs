//! CSV rendering of an [`ExportSummary`].

use csv::WriterBuilder;

use crate::error::{AppError, AppResult};
use crate::models::money::format_cents;
use crate::services::analytics::ExportSummary;

pub const CSV_FILENAME: &str = "spendwise_report.csv";

/// Three sections separated by blank lines: lifetime totals, the monthly
/// summary table and the full transaction history.
pub fn render_csv(summary: &ExportSummary) -> AppResult<Vec<u8>> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    wtr.write_record(["--- SPENDWISE LIFETIME SUMMARY ---"])?;
    wtr.write_record(["Total Income", &format_cents(summary.total_income_cents)])?;
    wtr.write_record([
        "Total Expenses",
        &format_cents(summary.total_expenses_cents),
    ])?;
    wtr.write_record(["Net Savings", &format_cents(summary.net_savings_cents)])?;
    wtr.write_record(["Savings Rate", &format!("{:.1}%", summary.savings_rate)])?;
    wtr.write_record([""])?;

    wtr.write_record(["--- MONTHLY SUMMARY ---"])?;
    wtr.write_record(["Month", "Income", "Expense", "Net Flow", "Status"])?;
    for m in &summary.months {
        wtr.write_record([
            m.month.to_string().as_str(),
            &format_cents(m.income_cents),
            &format_cents(m.expense_cents),
            &format_cents(m.net_flow_cents),
            m.status.label(),
        ])?;
    }
    wtr.write_record([""])?;

    wtr.write_record(["--- DETAILED TRANSACTION HISTORY ---"])?;
    wtr.write_record(["Date", "Type", "Category/Source", "Description", "Amount"])?;
    for entry in &summary.ledger {
        wtr.write_record([
            entry.date.to_string().as_str(),
            entry.kind.label(),
            &entry.category_or_source,
            entry.description.as_deref().unwrap_or("-"),
            &format_cents(entry.amount_cents),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV export: {}", e)))
}
