//! Wiring: the service's routes and its pipeline, as run by the binary.

use std::sync::Arc;

use crate::balance::TransactionController;
use crate::config::Settings;
use crate::error::Error;
use crate::health::{self, LIVENESS_PATH, READINESS_PATH};
use crate::middleware::{Authorization, Cors, Pipeline, RequestLogging};
use crate::router::Router;
use crate::telemetry::SharedSink;

/// Health probes plus the balance controller's routes.
pub fn router(controller: Arc<TransactionController>) -> Router {
    let router = Router::new()
        .get(LIVENESS_PATH, health::liveness)
        .get(READINESS_PATH, health::readiness);
    controller.routes(router)
}

/// `Cors → Authorization → RequestLogging → router`.
pub fn pipeline(settings: &Settings, sink: SharedSink, router: Router) -> Result<Pipeline, Error> {
    Pipeline::builder(sink)
        .stage(Cors::from_settings(&settings.cors))
        .stage_with(|sink| {
            Authorization::from_settings(sink, &settings.auth)
                .exempt([LIVENESS_PATH, READINESS_PATH])
        })
        .stage_with(RequestLogging::new)
        .terminal(router)
        .build()
}
