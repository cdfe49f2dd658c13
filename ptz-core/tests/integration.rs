//! Integration tests — full session lifecycle and error scenarios over
//! a real TCP connection on localhost.

use std::sync::Arc;
use std::time::Duration;

use ptz_core::{
    ConnectionManager, ConnectionPhase, MessageChannel, Message, ServerEndpoint,
    ShutdownCoordinator, TcpDialer, handshake,
};
use tokio::net::{TcpListener, TcpStream};

// ── Helpers ──────────────────────────────────────────────────────

/// Spin up a listener on an OS-assigned port and return the endpoint.
/// The listener is returned so the caller can accept on it.
async fn ephemeral_listener() -> (TcpListener, ServerEndpoint) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = ServerEndpoint::new(addr.ip().to_string(), addr.port());
    (listener, endpoint)
}

/// Serve one handshake on an accepted stream, offering `version`, and
/// return the client's reply.
async fn serve_handshake(stream: TcpStream, version: f64) -> Message {
    let mut chan = MessageChannel::new(stream, ServerEndpoint::new("peer", 0));
    let mut opening = Message::new();
    opening.insert("version", version);
    chan.send(&opening).await.unwrap();
    chan.receive().await.unwrap()
}

// ── Session lifecycle ────────────────────────────────────────────

#[tokio::test]
async fn test_session_lifecycle() {
    let (listener, endpoint) = ephemeral_listener().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        serve_handshake(stream, 0.3).await
    });

    let mgr = ConnectionManager::new(TcpDialer, endpoint);
    mgr.connect().await.unwrap();

    assert!(mgr.session().is_connected());
    assert_eq!(mgr.phase().await, ConnectionPhase::Connected);

    let reply = server.await.unwrap();
    assert_eq!(reply, handshake::reply());

    // Close exactly once; the second close is absorbed.
    mgr.close().await.unwrap();
    assert_eq!(mgr.phase().await, ConnectionPhase::Closed);
    assert!(!mgr.session().is_connected());
    mgr.close().await.unwrap();
    assert_eq!(mgr.phase().await, ConnectionPhase::Closed);
}

#[tokio::test]
async fn test_version_mismatch_then_accept() {
    let (listener, endpoint) = ephemeral_listener().await;

    let server = tokio::spawn(async move {
        // First connection: stale version, client must retry.
        let (stream, _) = listener.accept().await.unwrap();
        let first_reply = serve_handshake(stream, 0.1).await;

        // Second connection: matching version.
        let (stream, _) = listener.accept().await.unwrap();
        let second_reply = serve_handshake(stream, 0.3).await;

        (first_reply, second_reply)
    });

    let mgr = ConnectionManager::with_retry_timer(
        TcpDialer,
        endpoint,
        Duration::from_millis(50),
    );
    mgr.connect().await.unwrap();
    assert!(mgr.session().is_connected());

    // The fixed reply was sent on both attempts.
    let (first, second) = server.await.unwrap();
    assert_eq!(first, handshake::reply());
    assert_eq!(second, handshake::reply());
}

#[tokio::test]
async fn test_shutdown_with_no_server_listening() {
    // Learn a free port, then close the listener so dials are refused.
    let (listener, endpoint) = ephemeral_listener().await;
    drop(listener);

    let mgr = Arc::new(ConnectionManager::with_retry_timer(
        TcpDialer,
        endpoint,
        Duration::from_secs(5),
    ));

    let task = {
        let mgr = Arc::clone(&mgr);
        tokio::spawn(async move { mgr.connect().await })
    };

    // Give the loop time to fail a dial and park in the retry wait.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let coordinator = ShutdownCoordinator::new(Arc::clone(&mgr));
    coordinator.request_shutdown().await.unwrap();

    // The loop exits promptly instead of riding out the 5s delay.
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("connection task did not exit after shutdown")
        .unwrap()
        .unwrap();

    assert!(!mgr.session().is_connected());
    assert_ne!(mgr.phase().await, ConnectionPhase::Connected);
}
