pub mod budgets;
pub mod emergency_funds;
pub mod expenses;
pub mod feedback;
pub mod incomes;
pub mod recurring;
pub mod sessions;
pub mod transactions;
pub mod users;
