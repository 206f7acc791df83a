//! Line-graph payload returned by the balance endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::MonthlyBalance;

/// Chart-ready series: one label per month, one dataset per account.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineGraph {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Decimal>,
}

impl LineGraph {
    pub fn new(title: impl Into<String>, months: &[NaiveDate]) -> Self {
        Self {
            title: title.into(),
            labels: months.iter().map(|m| m.format("%b %Y").to_string()).collect(),
            datasets: Vec::new(),
        }
    }

    pub fn push_series(&mut self, label: impl Into<String>, series: &[MonthlyBalance]) {
        self.datasets.push(Dataset {
            label: label.into(),
            data: series.iter().map(|b| b.balance).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn serializes_labels_and_numeric_data() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        let mut graph = LineGraph::new("Balances", &[jan, feb]);
        graph.push_series(
            "Checking",
            &[
                MonthlyBalance { month: jan, balance: dec!(10.5) },
                MonthlyBalance { month: feb, balance: dec!(-2) },
            ],
        );

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Balances",
                "labels": ["Jan 2026", "Feb 2026"],
                "datasets": [{ "label": "Checking", "data": [10.5, -2.0] }]
            })
        );
    }
}
