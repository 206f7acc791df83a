//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can the service answer balance queries? |
//!
//! Both are registered by [`app::router`](crate::app::router) and exempt from
//! authorization.

use serde::Serialize;

use crate::{Json, Request};

pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

#[derive(Debug, Serialize)]
pub struct Probe {
    pub status: &'static str,
}

/// Always `200 OK` with `{"status":"ok"}`; no dependencies.
pub async fn liveness(_req: Request) -> Json<Probe> {
    Json(Probe { status: "ok" })
}

/// `200 OK` with `{"status":"ready"}`. The data context is in memory and
/// seeded before the server binds, so there is nothing further to wait for.
pub async fn readiness(_req: Request) -> Json<Probe> {
    Json(Probe { status: "ready" })
}
