//! CLI argument types.
//!
//! Defined separately from `main.rs` so integration tests can construct and
//! parse them directly.

use clap::Parser;

/// Stdio-to-HTTP relay for MCP clients.
///
/// Reads one JSON-RPC 2.0 request per line from stdin, POSTs each one to the
/// configured endpoint, and writes the response to stdout.
#[derive(Parser, Debug)]
#[command(name = "mcp-relay", version)]
pub struct RelayArgs {
    /// Endpoint URL to forward requests to. Falls back to the
    /// MCP_RELAY_ENDPOINT environment variable.
    pub endpoint: Option<String>,

    /// Enable debug logging on stderr.
    #[arg(long)]
    pub verbose: bool,
}
