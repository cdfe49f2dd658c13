//! Connection ownership and the connect/retry/close protocol.
//!
//! `ConnectionManager` owns the one outbound connection to the rig
//! service: it drives the dial → handshake → ready loop, retries
//! failures with a fixed delay, and reconciles a user close request
//! with whatever phase the loop is in. `ShutdownCoordinator` is the
//! thin mediator the UI's quit action goes through.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tracing::{info, warn};

use crate::channel::MessageChannel;
use crate::endpoint::ServerEndpoint;
use crate::error::PtzError;
use crate::handshake;
use crate::state::{ConnectionPhase, SessionState};

/// Fixed delay between unsuccessful connection or handshake attempts.
pub const RETRY_TIMER: Duration = Duration::from_secs(5);

// ── Dialer ───────────────────────────────────────────────────────

/// Opens a transport stream to an endpoint.
///
/// The seam that lets the session loop run against in-memory streams
/// in tests; production uses [`TcpDialer`].
#[async_trait]
pub trait Dialer: Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    async fn dial(&self, endpoint: &ServerEndpoint) -> io::Result<Self::Stream>;
}

/// Production dialer over plain TCP.
#[derive(Debug, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, endpoint: &ServerEndpoint) -> io::Result<TcpStream> {
        TcpStream::connect(endpoint.to_socket_string()).await
    }
}

// ── ConnectionManager ────────────────────────────────────────────

struct Inner<T> {
    phase: ConnectionPhase,
    transport: Option<MessageChannel<T>>,
}

/// Owns the single outbound connection to the PTZ rig service.
///
/// At most one connection attempt is in flight at a time, and a
/// channel that reached `Connected` is never handshaken again.
pub struct ConnectionManager<D: Dialer> {
    dialer: D,
    endpoint: ServerEndpoint,
    retry_timer: Duration,
    session: Arc<SessionState>,
    /// Governs the retry loop. Set to false exactly once, by a close
    /// request that arrives before the session is up; the loop never
    /// re-enters `Connecting` afterwards.
    keep_open: AtomicBool,
    /// Cuts the retry sleep short when a pre-connect close arrives.
    shutdown: Notify,
    inner: Mutex<Inner<D::Stream>>,
}

impl<D: Dialer> ConnectionManager<D> {
    pub fn new(dialer: D, endpoint: ServerEndpoint) -> Self {
        Self::with_retry_timer(dialer, endpoint, RETRY_TIMER)
    }

    pub fn with_retry_timer(dialer: D, endpoint: ServerEndpoint, retry_timer: Duration) -> Self {
        let session = SessionState::new(endpoint.clone());
        Self {
            dialer,
            endpoint,
            retry_timer,
            session,
            keep_open: AtomicBool::new(true),
            shutdown: Notify::new(),
            inner: Mutex::new(Inner {
                phase: ConnectionPhase::Disconnected,
                transport: None,
            }),
        }
    }

    /// The status view shared with the UI.
    pub fn session(&self) -> Arc<SessionState> {
        Arc::clone(&self.session)
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// Current lifecycle phase. Primarily for diagnostics and tests.
    pub async fn phase(&self) -> ConnectionPhase {
        self.inner.lock().await.phase
    }

    /// Connect to the rig service, retrying indefinitely.
    ///
    /// Suspends until the session reaches `Connected` or a close
    /// request clears `keep_open`; returns `Ok` in both cases. The
    /// caller inspects [`SessionState`] to learn which. Transport
    /// failures and handshake rejections are both transient: fixed
    /// delay, no backoff, no attempt cap.
    pub async fn connect(&self) -> Result<(), PtzError> {
        while self.keep_open.load(Ordering::Acquire) {
            self.inner.lock().await.phase.begin_connect()?;
            info!(
                "attempting to connect to server at {}",
                self.endpoint
            );

            let stream = match self.dialer.dial(&self.endpoint).await {
                Ok(stream) => stream,
                Err(err) => {
                    info!(
                        "connection to server at {} failed, retry in {}s: {}",
                        self.endpoint,
                        self.retry_timer.as_secs(),
                        err
                    );
                    self.inner.lock().await.phase.retry()?;
                    self.wait_retry().await;
                    continue;
                }
            };

            // A close request may have landed while the dial was in
            // flight; the freshly opened stream is then discarded
            // without a handshake.
            if !self.keep_open.load(Ordering::Acquire) {
                self.inner.lock().await.phase.retry()?;
                break;
            }

            self.inner.lock().await.phase.begin_handshake()?;
            let mut channel = MessageChannel::new(stream, self.endpoint.clone());

            match handshake::perform(&mut channel).await {
                Ok(true) => {
                    let mut inner = self.inner.lock().await;
                    inner.phase.complete_handshake()?;
                    inner.transport = Some(channel);
                    drop(inner);
                    self.session.set_connected(true);
                    info!("connected to server at {}", self.endpoint);
                    return Ok(());
                }
                Ok(false) => {
                    warn!("bad handshake with server at {}", self.endpoint);
                }
                Err(err) => {
                    warn!(
                        "handshake with server at {} aborted: {}",
                        self.endpoint, err
                    );
                }
            }

            // Rejection path: discard the transport, retry like a
            // transport failure.
            drop(channel);
            self.inner.lock().await.phase.retry()?;
            self.wait_retry().await;
        }
        Ok(())
    }

    /// Close the session, reconciling with the current phase.
    ///
    /// Connected: tear the transport down once and move to `Closed`.
    /// Not yet connected: clear `keep_open` so the retry loop exits at
    /// its next suspension point; no transport is touched (none may
    /// exist). Idempotent in every phase — closing a `Closed` or
    /// never-connected session is bookkeeping only.
    pub async fn close(&self) -> Result<(), PtzError> {
        let mut inner = self.inner.lock().await;
        match inner.phase {
            ConnectionPhase::Connected => {
                inner.phase.begin_close()?;
                self.session.set_connected(false);
                if let Some(channel) = inner.transport.take() {
                    channel.close().await?;
                }
                inner.phase.finish_close()?;
                info!("server connection closed");
            }
            ConnectionPhase::Closed => {}
            _ => {
                self.keep_open.store(false, Ordering::Release);
                // notify_one stores a permit, so a close landing while
                // a dial is in flight still skips the next retry wait.
                self.shutdown.notify_one();
            }
        }
        Ok(())
    }

    /// Sleep the fixed retry delay, waking early on a close request.
    async fn wait_retry(&self) {
        tokio::select! {
            () = tokio::time::sleep(self.retry_timer) => {}
            () = self.shutdown.notified() => {}
        }
    }
}

// ── ShutdownCoordinator ──────────────────────────────────────────

/// Mediates the UI's quit action onto the connection manager.
///
/// Does not know which close path will run; that is the manager's
/// decision based on the current phase.
pub struct ShutdownCoordinator<D: Dialer> {
    manager: Arc<ConnectionManager<D>>,
}

impl<D: Dialer> ShutdownCoordinator<D> {
    pub fn new(manager: Arc<ConnectionManager<D>>) -> Self {
        Self { manager }
    }

    pub async fn request_shutdown(&self) -> Result<(), PtzError> {
        info!("shutdown requested");
        self.manager.close().await
    }
}

// ── Tests ────────────────────────────────────────────────────────
