//! End-of-month balance series.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::BalanceError;
use super::data::{AccountId, DataContext};

/// Length of the balance window, in calendar months.
pub const WINDOW_MONTHS: u32 = 12;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyBalance {
    /// First day of the month.
    pub month: NaiveDate,
    /// Balance at the end of the month, or as of today for the current month.
    pub balance: Decimal,
}

/// First days of the twelve months ending with `as_of`'s month, oldest first.
pub fn window(as_of: NaiveDate) -> Vec<NaiveDate> {
    let current = first_of_month(as_of);
    (0..WINDOW_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// End-of-month balances of one account over the twelve months ending with
/// the month of `as_of`.
///
/// A month's balance is the opening balance plus every transaction posted on
/// or before its last day (or `as_of`, for the current month). Months that
/// end before the account was opened read as zero.
pub fn last_12_month_balances(
    ctx: &DataContext,
    account_id: AccountId,
    as_of: NaiveDate,
) -> Result<Vec<MonthlyBalance>, BalanceError> {
    let account = ctx.account(account_id).ok_or(BalanceError::UnknownAccount(account_id))?;

    let mut postings: Vec<_> = ctx
        .transactions_for(account_id)
        .map(|t| (t.posted_on, t.amount))
        .collect();
    postings.sort_by_key(|(date, _)| *date);

    let mut running = account.opening_balance;
    let mut pending = postings.into_iter().peekable();

    let series = window(as_of)
        .into_iter()
        .map(|month| {
            let cutoff = last_of_month(month).min(as_of);
            while let Some((_, amount)) = pending.next_if(|(date, _)| *date <= cutoff) {
                running += amount;
            }
            let balance = if cutoff < account.opened_on { Decimal::ZERO } else { running };
            MonthlyBalance { month, balance }
        })
        .collect();

    Ok(series)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(month: NaiveDate) -> NaiveDate {
    first_of_month(month)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
