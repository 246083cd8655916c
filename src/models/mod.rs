pub mod budget;
pub mod emergency_fund;
pub mod feedback;
pub mod money;
pub mod recurring;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetRequest, NewBudget};
pub use emergency_fund::{EmergencyFund, EmergencyFundSummary, EmergencyFundUpdate};
pub use feedback::{Feedback, FeedbackRequest};
pub use recurring::{Frequency, NewRecurringExpense, RecurringExpense, RecurringRequest};
pub use transaction::{
    Expense, ExpenseRequest, Income, IncomeRequest, NewExpense, NewIncome, Transaction,
    TransactionKind,
};
pub use user::{NewUser, User};
