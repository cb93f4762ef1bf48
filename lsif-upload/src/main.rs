use clap::Parser;
use lsif_upload::cli::{error_report, run, Cli};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,lsif_upload=off,lsif_upload_core=off";

#[tokio::main]
async fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is reserved for the upload report and --get-curl output.
    // Pipeline failures are printed once below, so the crate's own events stay quiet by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");
    match run(cli).await {
        Ok(()) => tracing::info!("CLI completed successfully"),
        Err(e) => {
            tracing::debug!(error = %e, "CLI exited with error");
            eprintln!("{}", error_report(&e));
            std::process::exit(1);
        }
    }
}
