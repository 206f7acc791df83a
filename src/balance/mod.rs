//! Account balances over the last twelve months.
//!
//! [`DataContext`] holds the fixed demo dataset, [`last_12_month_balances`]
//! folds it into end-of-month balances, [`LineGraph`] is the JSON shape the
//! dashboard charts, and [`TransactionController`] puts it all on two routes.

mod aggregate;
mod controller;
mod data;
mod graph;

pub use aggregate::{MonthlyBalance, WINDOW_MONTHS, last_12_month_balances, window};
pub use controller::{ACCOUNT_BALANCES_ROUTE, BALANCES_ROUTE, TransactionController};
pub use data::{Account, AccountId, DataContext, Transaction};
pub use graph::{Dataset, LineGraph};

#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),
}
