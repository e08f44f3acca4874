// Entrypoint for the CLI application.
// - Reads configuration, opens the log file and builds the API client.
// - Hands them to the interactive flow; a failed run prints why and exits
//   with a non-zero status.

use clap::Parser;
use std::process::ExitCode;
use table_orders_cli::{
    api::ApiClient,
    config::Config,
    flow::Session,
    logging,
    selection::ConsoleSelector,
};

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();
    let _guard = logging::init(&config.log_file)?;
    tracing::info!(base_url = %config.base_url, "run started");

    let mut api = ApiClient::new(&config.base_url, !config.quiet)?;
    let mut selector = ConsoleSelector;
    let mut stdout = std::io::stdout();

    let query = config.query();
    let mut session = Session::new(&mut api, &mut selector, &mut stdout);
    match session.run(&query) {
        Ok(outcome) => {
            tracing::info!(orders = outcome.orders.len(), "run finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("\nStopped: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
