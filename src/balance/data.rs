//! Fake in-memory data context.
//!
//! Three accounts with fourteen months of deterministic activity ending at
//! the anchor date, so the last-twelve-month view is always fully populated.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

pub type AccountId = u32;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub opening_balance: Decimal,
    pub opened_on: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    pub id: u64,
    pub account_id: AccountId,
    pub posted_on: NaiveDate,
    /// Signed: deposits are positive, withdrawals negative.
    pub amount: Decimal,
}

/// Read-only store of accounts and their transactions.
#[derive(Debug, Default)]
pub struct DataContext {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

const SEEDED_MONTHS: u32 = 14;

impl DataContext {
    pub fn new(accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        Self { accounts, transactions }
    }

    /// The fixed demo dataset, laid out relative to `anchor`.
    ///
    /// Accounts open on the first day of the month fourteen months before
    /// `anchor`; no transaction is dated after `anchor`.
    pub fn seeded(anchor: NaiveDate) -> Self {
        let first_month = anchor
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(SEEDED_MONTHS)))
            .unwrap_or(NaiveDate::MIN);

        let accounts = vec![
            Account { id: 1, name: "Everyday Checking".to_owned(), opening_balance: dec!(2500.00), opened_on: first_month },
            Account { id: 2, name: "High-Yield Savings".to_owned(), opening_balance: dec!(10000.00), opened_on: first_month },
            Account { id: 3, name: "Rewards Credit Card".to_owned(), opening_balance: dec!(-350.00), opened_on: first_month },
        ];

        let mut seed = Seed { next_id: 1, anchor, out: Vec::new() };
        for m in 0..=SEEDED_MONTHS {
            let Some(month) = first_month.checked_add_months(Months::new(m)) else {
                break;
            };
            let i = Decimal::from(m);

            // checking
            seed.post(1, month, 1, dec!(3200.00));
            seed.post(1, month, 3, dec!(-1450.00));
            seed.post(1, month, 12, -(dec!(300.00) + dec!(15.00) * Decimal::from(m % 5)));
            seed.post(1, month, 20, -(dec!(120.00) + dec!(7.50) * Decimal::from(m % 3)));
            seed.post(1, month, 26, dec!(-400.00));

            // savings
            seed.post(2, month, 2, dec!(400.00));
            seed.post(2, month, 28, dec!(10.00) + i);

            // card
            seed.post(3, month, 15, -(dec!(200.00) + dec!(25.00) * Decimal::from(m % 4)));
            seed.post(3, month, 25, dec!(180.00) + dec!(20.00) * Decimal::from(m % 3));
        }

        Self { accounts, transactions: seed.out }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn transactions_for(&self, id: AccountId) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.account_id == id)
    }
}

struct Seed {
    next_id: u64,
    anchor: NaiveDate,
    out: Vec<Transaction>,
}

impl Seed {
    fn post(&mut self, account_id: AccountId, month: NaiveDate, day: u32, amount: Decimal) {
        let Some(posted_on) = month.with_day(day) else {
            return;
        };
        if posted_on > self.anchor {
            return;
        }
        self.out.push(Transaction { id: self.next_id, account_id, posted_on, amount });
        self.next_id += 1;
    }
}
