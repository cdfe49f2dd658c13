//! Session lifecycle state.
//!
//! `ConnectionPhase` models the client side of one session with
//! validated transitions that return `Result` instead of panicking.
//! `SessionState` is the read-only view of that lifecycle handed to
//! the UI.
//!
//! ```text
//!  Disconnected ──► Connecting ──► Handshaking ──► Connected
//!       ▲               │               │              │
//!       │    (failure)  ▼   (rejection) ▼              ▼
//!       └───────────────┴───────────────┘           Closing ──► Closed
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::endpoint::ServerEndpoint;
use crate::error::PtzError;

// ── ConnectionPhase ──────────────────────────────────────────────

/// The current phase of the client's session with the PTZ service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    /// No active connection. Initial state, also re-entered between
    /// retry attempts.
    #[default]
    Disconnected,

    /// A dial to the server is in flight.
    Connecting,

    /// Transport is up; version/magic handshake in progress.
    Handshaking,

    /// Handshake accepted; the session stays open until closed.
    Connected,

    /// User-initiated teardown in progress.
    Closing,

    /// Terminal state after a graceful close.
    Closed,
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Handshaking => write!(f, "Handshaking"),
            Self::Connected => write!(f, "Connected"),
            Self::Closing => write!(f, "Closing"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl ConnectionPhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Transition to `Connecting`. Valid from: `Disconnected`.
    pub fn begin_connect(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Disconnected => {
                *self = Self::Connecting;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot connect: not in Disconnected state",
            )),
        }
    }

    /// Transition to `Handshaking`. Valid from: `Connecting`.
    pub fn begin_handshake(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Connecting => {
                *self = Self::Handshaking;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot handshake: not in Connecting state",
            )),
        }
    }

    /// Transition to `Connected`. Valid from: `Handshaking`.
    pub fn complete_handshake(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Handshaking => {
                *self = Self::Connected;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot complete handshake: not in Handshaking state",
            )),
        }
    }

    /// Fall back to `Disconnected` after a failed attempt.
    ///
    /// Valid from: `Connecting` (dial failure), `Handshaking`
    /// (rejection or decode failure).
    pub fn retry(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Connecting | Self::Handshaking => {
                *self = Self::Disconnected;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot retry: no attempt in progress",
            )),
        }
    }

    /// Transition to `Closing`. Valid from: `Connected`.
    pub fn begin_close(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Connected => {
                *self = Self::Closing;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot close: not in Connected state",
            )),
        }
    }

    /// Transition to `Closed`. Valid from: `Closing`.
    pub fn finish_close(&mut self) -> Result<(), PtzError> {
        match self {
            Self::Closing => {
                *self = Self::Closed;
                Ok(())
            }
            _ => Err(PtzError::ProtocolViolation(
                "cannot finish close: not in Closing state",
            )),
        }
    }
}

// ── SessionState ─────────────────────────────────────────────────

/// Live session status read by the UI.
///
/// Single-writer: only the `ConnectionManager` flips the flag, at the
/// points where [`ConnectionPhase`] changes, so the UI always observes
/// a completed transition. Holds `connected == true` exactly while the
/// phase is `Connected`.
#[derive(Debug)]
pub struct SessionState {
    connected: AtomicBool,
    endpoint: ServerEndpoint,
}

impl SessionState {
    pub fn new(endpoint: ServerEndpoint) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(false),
            endpoint,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

// ── Tests ────────────────────────────────────────────────────────
