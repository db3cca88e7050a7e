//! LPSE Resolver Main Entry Point
//!
//! Resolves LPSE request paths read from stdin and writes JSON lines to stdout.

use dotenv::dotenv;
use lpse_resolver::{Dependencies, ResolverError};
use std::env;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// Logs go to stderr so they never mix with the JSON lines on stdout.
fn init_tracing() -> Result<(), ResolverError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lpse_resolver=info,lpse_repository=info"));

    let json = env::var("LPSE_LOG_JSON").is_ok_and(|v| v == "true" || v == "1");

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .pretty(),
            )
            .try_init()
    };
    result.map_err(|e| ResolverError::TracingError(e.to_string()))?;

    info!(
        service_name = "lpse-resolver",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ResolverError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting LPSE resolver");

    let deps = match Dependencies::new() {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps
        .orchestrator
        .run(BufReader::new(stdin()), stdout())
        .await
    {
        Ok(summary) => {
            info!(
                requests = summary.requests,
                apply_errors = summary.apply_errors,
                "LPSE resolver completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "LPSE resolver failed");
            Err(e.into())
        }
    }
}
