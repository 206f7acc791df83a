//! The transaction controller: balance graphs over HTTP.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use http::StatusCode;
use serde_json::json;

use super::BalanceError;
use super::aggregate::{last_12_month_balances, window};
use super::data::{AccountId, DataContext};
use super::graph::LineGraph;
use crate::handler::Outcome;
use crate::{Json, Request, Response, Router};

/// Route serving every account's balance series.
pub const BALANCES_ROUTE: &str = "/api/Transaction/GetLast12MonthBalances";
/// Route serving a single account's balance series.
pub const ACCOUNT_BALANCES_ROUTE: &str = "/api/Transaction/GetLast12MonthBalances/{accountId}";

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct TransactionController {
    data: Arc<DataContext>,
    today: Clock,
}

impl TransactionController {
    /// Controller dated by the system clock (UTC).
    pub fn new(data: Arc<DataContext>) -> Self {
        Self::with_clock(data, || Utc::now().date_naive())
    }

    pub fn with_clock(data: Arc<DataContext>, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        Self { data, today: Arc::new(today) }
    }

    /// All accounts, one dataset each, in account order.
    pub fn all_balances(&self) -> Result<LineGraph, BalanceError> {
        let as_of = (self.today)();
        let mut graph = LineGraph::new("Account balances, last 12 months", &window(as_of));
        for account in self.data.accounts() {
            let series = last_12_month_balances(&self.data, account.id, as_of)?;
            graph.push_series(account.name.clone(), &series);
        }
        Ok(graph)
    }

    pub fn account_balances(&self, id: AccountId) -> Result<LineGraph, BalanceError> {
        let as_of = (self.today)();
        let account = self.data.account(id).ok_or(BalanceError::UnknownAccount(id))?;
        let series = last_12_month_balances(&self.data, id, as_of)?;

        let mut graph = LineGraph::new(format!("{}, last 12 months", account.name), &window(as_of));
        graph.push_series(account.name.clone(), &series);
        Ok(graph)
    }

    /// Registers both balance routes on `router`.
    pub fn routes(self: Arc<Self>, router: Router) -> Router {
        let all = Arc::clone(&self);
        let one = self;

        router
            .get(BALANCES_ROUTE, move |_req: Request| {
                let ctl = Arc::clone(&all);
                async move { ctl.get_all() }
            })
            .get(ACCOUNT_BALANCES_ROUTE, move |req: Request| {
                let ctl = Arc::clone(&one);
                async move { ctl.get_one(&req) }
            })
    }

    fn get_all(&self) -> Outcome {
        Json(self.all_balances()?).try_into_response()
    }

    fn get_one(&self, req: &Request) -> Outcome {
        let Some(id) = req.param("accountId").and_then(|raw| raw.parse::<AccountId>().ok()) else {
            return error_body(StatusCode::BAD_REQUEST, "accountId must be a positive integer");
        };

        match self.account_balances(id) {
            Ok(graph) => Json(graph).try_into_response(),
            Err(e @ BalanceError::UnknownAccount(_)) => error_body(StatusCode::NOT_FOUND, &e.to_string()),
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Outcome {
    let body = serde_json::to_vec(&json!({ "error": message }))?;
    Ok(Response::builder().status(status).json(body))
}
