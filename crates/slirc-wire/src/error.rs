//! Wire-level error types.

use thiserror::Error;

/// Errors produced while framing lines off the transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WireError {
    /// An I/O error from the underlying transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
