//! Domain-specific error types for the PTZ session layer.
//!
//! All fallible operations return `Result<T, PtzError>`.
//! Connection-layer failures are absorbed by the retry loop — nothing
//! here is fatal to the process.

use thiserror::Error;

/// The canonical error type for the PTZ client protocol.
#[derive(Debug, Error)]
pub enum PtzError {
    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// An mpsc channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    // ── Protocol Errors ──────────────────────────────────────────
    /// The server's handshake offer was not acceptable.
    #[error("handshake rejected by server at {endpoint}")]
    HandshakeRejected { endpoint: String },

    /// An operation was attempted in the wrong connection phase.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    // ── Serialization Errors ─────────────────────────────────────
    /// Received bytes that do not parse as a message mapping.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for PtzError {
    fn from(e: serde_json::Error) -> Self {
        PtzError::Decode(e.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for PtzError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        PtzError::ChannelClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = PtzError::HandshakeRejected {
            endpoint: "fc0:50201".to_string(),
        };
        assert!(e.to_string().contains("fc0:50201"));

        let e = PtzError::Decode("unexpected token".to_string());
        assert!(e.to_string().contains("unexpected token"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e: PtzError = io_err.into();
        assert!(matches!(e, PtzError::Connection(_)));
    }

    #[test]
    fn from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let e: PtzError = parse_err.into();
        assert!(matches!(e, PtzError::Decode(_)));
    }
}
