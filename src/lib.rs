//! Stdio-to-HTTP relay for MCP clients.
//!
//! Reads newline-delimited JSON-RPC 2.0 requests on stdin, forwards each one
//! as an HTTP POST to a single configured endpoint, and writes the endpoint's
//! response back on stdout. Every response is written as one line and flushed
//! immediately, so an interactive host process never waits on buffered output.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod jsonrpc;
pub mod transport;
