//! # ptz-core
//!
//! Session library for the PTZ rig console client.
//!
//! This crate contains:
//! - **Endpoint**: `ServerEndpoint` — address of the rig control service
//! - **Message**: the key/value payload unit and its wire encoding
//! - **Channel**: `MessageChannel` — EOF-framed message I/O over a transport
//! - **Handshake**: the version/magic exchange run once per connection
//! - **State**: `ConnectionPhase` lifecycle machine and the UI-facing `SessionState`
//! - **Session**: `ConnectionManager` retry loop, `Dialer` seam, `ShutdownCoordinator`
//! - **Error**: `PtzError` — typed, `thiserror`-based error hierarchy

pub mod channel;
pub mod endpoint;
pub mod error;
pub mod handshake;
pub mod message;
pub mod session;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use channel::MessageChannel;
pub use endpoint::{DEFAULT_HOST, DEFAULT_PORT, ServerEndpoint};
pub use error::PtzError;
pub use handshake::{MAGIC, PROTOCOL_VERSION};
pub use message::Message;
pub use session::{ConnectionManager, Dialer, RETRY_TIMER, ShutdownCoordinator, TcpDialer};
pub use state::{ConnectionPhase, SessionState};
