//! Bridge loop: read a line, decode, submit, write a line, flush.
//!
//! Control flow is strictly linear. One line is processed fully before the
//! next is read, so responses leave in arrival order with no reordering. The
//! loop ends at end of input (normal termination) or on a stream I/O failure
//! (abnormal termination); nothing else stops it.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::error::{FrameError, RelayError};
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::transport::JsonRpcTransport;

/// Maximum input line size (10 MiB).
///
/// Lines exceeding this limit are answered with a parse-error response
/// before JSON parsing, so crafted input cannot force allocation of
/// oversized `serde_json::Value` trees.
pub const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// Well-formed fallback for the unreachable case where a response fails to
/// serialize; the host must never receive a non-envelope line.
const FALLBACK_RESPONSE: &[u8] =
    br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Drive the per-line cycle for the lifetime of the input stream.
///
/// Each line is trimmed of surrounding whitespace; lines empty after
/// trimming are skipped with no output. A non-empty line either decodes
/// into a request (delegated to the transport) or is answered with a
/// `-32700` response carrying a null id. Every emitted response is followed
/// by a flush, so the host observes it immediately.
///
/// # Errors
///
/// Returns [`RelayError::Stream`] when reading the input stream fails for a
/// reason other than end of stream, or when writing the output stream fails.
pub async fn run_bridge<R, W, T>(
    mut reader: R,
    mut writer: W,
    transport: &T,
) -> Result<(), RelayError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: JsonRpcTransport,
{
    let mut line = Vec::new();

    loop {
        line.clear();

        let bytes_read = match bounded_read_line(&mut reader, &mut line, MAX_LINE_BYTES).await {
            Ok(n) => n,
            Err(FrameError::LineTooLarge { max_bytes }) => {
                warn!(max_bytes, "input line exceeded size limit");
                let response = JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!(
                        "line exceeds maximum size of {max_bytes} bytes"
                    )),
                );
                write_response(&mut writer, &response).await?;
                continue;
            }
            Err(FrameError::Io(e)) => {
                return Err(RelayError::Stream {
                    stream: "input",
                    source: e,
                });
            }
        };

        if bytes_read == 0 {
            debug!("input stream closed");
            return Ok(());
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        // Decoding from raw bytes makes invalid UTF-8 just another parse
        // failure rather than a stream error.
        let response = match serde_json::from_slice::<JsonRpcRequest>(trimmed) {
            Ok(request) => transport.submit(&request).await,
            Err(e) => {
                debug!(error = %e, "undecodable input line");
                JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string()))
            }
        };

        write_response(&mut writer, &response).await?;
    }
}

/// Serialize a response, write it as one line, and flush.
///
/// The flush per line is a hard interactivity contract: the host reads
/// responses interactively and must never wait on buffered output.
async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<(), RelayError> {
    let mut line =
        serde_json::to_vec(response).unwrap_or_else(|_| FALLBACK_RESPONSE.to_vec());
    line.push(b'\n');

    writer
        .write_all(&line)
        .await
        .map_err(|e| RelayError::Stream {
            stream: "output",
            source: e,
        })?;
    writer.flush().await.map_err(|e| RelayError::Stream {
        stream: "output",
        source: e,
    })
}

/// Read a single line from an async buffered reader, enforcing a byte limit.
///
/// Unlike bare `read_line`, this will not allocate unbounded memory if the
/// peer sends a continuous stream of bytes without a newline. On overflow
/// the remainder of the line is drained so the reader is positioned at the
/// next line.
///
/// Returns `Ok(n)` with `n > 0` when a line (or a final unterminated
/// fragment) was read, `Ok(0)` at end of stream.
async fn bounded_read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_bytes: usize,
) -> Result<usize, FrameError> {
    let mut total = 0usize;
    loop {
        let available = reader.fill_buf().await?;

        // End of stream: return what we have (0 if nothing).
        if available.is_empty() {
            return Ok(total);
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let to_consume = pos + 1;
                if total + to_consume > max_bytes {
                    reader.consume(to_consume);
                    return Err(FrameError::LineTooLarge { max_bytes });
                }
                buf.extend_from_slice(&available[..to_consume]);
                total += to_consume;
                reader.consume(to_consume);
                return Ok(total);
            }
            None => {
                let len = available.len();
                if total + len > max_bytes {
                    reader.consume(len);
                    drain_until_newline(reader).await;
                    return Err(FrameError::LineTooLarge { max_bytes });
                }
                buf.extend_from_slice(available);
                total += len;
                reader.consume(len);
            }
        }
    }
}

/// Discard input up to and including the next newline, or to end of stream.
async fn drain_until_newline<R: AsyncBufRead + Unpin>(reader: &mut R) {
    loop {
        let available = match reader.fill_buf().await {
            Ok(available) => available,
            Err(_) => return,
        };
        if available.is_empty() {
            return;
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return;
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
