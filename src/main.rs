use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use ledgerline::balance::{DataContext, TransactionController};
use ledgerline::config::Settings;
use ledgerline::telemetry::{self, TracingSink};
use ledgerline::{Error, Server, app};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ledgerline: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = telemetry::init(&settings.log) {
        eprintln!("ledgerline: {e}");
        return ExitCode::FAILURE;
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), Error> {
    let data = Arc::new(DataContext::seeded(Utc::now().date_naive()));
    info!(accounts = data.accounts().len(), "data context seeded");

    let controller = Arc::new(TransactionController::new(data));
    let pipeline = app::pipeline(&settings, TracingSink::shared(), app::router(controller))?;

    Server::bind(&settings.server.bind)?.serve(pipeline).await
}
