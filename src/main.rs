//! mcp-relay entry point.
//!
//! Resolves configuration, builds the transport client, and drives the
//! bridge loop over stdin/stdout until end of input.

use clap::Parser;
use tokio::io::BufReader;

use mcp_relay::bridge::run_bridge;
use mcp_relay::cli::RelayArgs;
use mcp_relay::config::RelayConfig;
use mcp_relay::error::RelayError;
use mcp_relay::transport::TransportClient;

#[tokio::main]
async fn main() {
    let args = RelayArgs::parse();
    init_tracing(args.verbose);

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "relay failed");
            eprintln!("mcp-relay: {e}");
            1
        }
    };

    std::process::exit(code);
}

/// Run the relay until the input stream ends.
///
/// Startup failures and fatal stream errors propagate to `main` for stderr
/// reporting; stdout carries JSON-RPC payloads only.
async fn run(args: RelayArgs) -> Result<(), RelayError> {
    let config = RelayConfig::resolve(args.endpoint)?;
    let client = TransportClient::new(&config)?;

    tracing::info!(
        endpoint = %client.endpoint(),
        timeout_secs = config.timeout.as_secs(),
        "relay started"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    run_bridge(stdin, stdout, &client).await?;

    tracing::info!("input stream closed, shutting down");
    Ok(())
}

/// Initialise tracing with stderr output.
///
/// When `verbose` is true, sets the filter to `debug`. Otherwise respects
/// the `RUST_LOG` environment variable (defaulting to no output), keeping
/// stderr quiet for well-behaved runs.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
