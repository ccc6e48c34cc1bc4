//! Error types for the relay process.
//!
//! `FrameError` covers line framing failures on the input stream. Undecodable
//! JSON is not an error at this level: it is answered on stdout with a
//! JSON-RPC parse-error response, never raised.
//!
//! `RelayError` covers the failures that terminate the process: startup
//! configuration, HTTP client construction, and unrecoverable stream I/O.

use crate::config::ConfigError;

/// Errors from reading one NDJSON line off the input stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A single line exceeded the maximum size before a newline was found.
    ///
    /// Checked during the read so a peer that never sends a newline cannot
    /// force unbounded allocation.
    #[error("line exceeds maximum size of {max_bytes} bytes")]
    LineTooLarge {
        /// The configured maximum line size in bytes.
        max_bytes: usize,
    },

    /// An underlying I/O error while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal relay errors. Reported on stderr with a non-zero exit code; JSON-RPC
/// payloads never travel through this type.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Startup configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Human-readable description of the build failure.
        reason: String,
    },

    /// The input or output stream failed for a reason other than end of
    /// stream.
    #[error("{stream} stream failed: {source}")]
    Stream {
        /// Which stream failed ("input" or "output").
        stream: &'static str,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
