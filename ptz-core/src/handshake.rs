//! Version/identity handshake run once per fresh connection.
//!
//! The server speaks first. The client reads the opening message,
//! decides acceptance from its `version` key, and replies with the
//! fixed version/magic payload either way — acceptance is determined
//! by the comparison alone, not by the reply.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::MessageChannel;
use crate::error::PtzError;
use crate::message::Message;

/// Protocol family identifier sent in the client's reply. Not
/// validated on receipt; the server checks it.
pub const MAGIC: &str = "pr7d68j1";

/// Protocol version of this client build, compared against the
/// server's advertised version for acceptance.
pub const PROTOCOL_VERSION: f64 = 0.3;

/// The fixed reply sent to every server opening message.
pub fn reply() -> Message {
    let mut msg = Message::new();
    msg.insert("version", PROTOCOL_VERSION).insert("magic", MAGIC);
    msg
}

/// Run the handshake over a freshly opened channel.
///
/// Returns `Ok(true)` when the server's opening message carries a
/// `version` key equal to [`PROTOCOL_VERSION`]; `Ok(false)` on a
/// mismatched or absent version. A message that fails to decode aborts
/// the attempt with [`PtzError::Decode`] before any reply is sent.
pub async fn perform<T>(channel: &mut MessageChannel<T>) -> Result<bool, PtzError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    let opening = channel.receive().await?;
    let accepted = opening
        .get_number("version")
        .is_some_and(|v| v == PROTOCOL_VERSION);
    channel.send(&reply()).await?;
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ServerEndpoint;
    use tokio::io::duplex;

    async fn run_against(opening: Message) -> (Result<bool, PtzError>, Message) {
        let (client, server) = duplex(4096);
        let ep = ServerEndpoint::new("test", 1);

        let server_task = tokio::spawn(async move {
            let mut chan = MessageChannel::new(server, ServerEndpoint::new("test", 1));
            chan.send(&opening).await.unwrap();
            chan.receive().await.unwrap()
        });

        let mut chan = MessageChannel::new(client, ep);
        let result = perform(&mut chan).await;
        let observed_reply = server_task.await.unwrap();
        (result, observed_reply)
    }

    #[test]
    fn reply_payload_is_fixed() {
        let msg = reply();
        assert_eq!(msg.get_number("version"), Some(0.3));
        assert_eq!(
            msg.get("magic").and_then(|v| v.as_str()),
            Some("pr7d68j1")
        );
    }

    #[tokio::test]
    async fn matching_version_is_accepted() {
        let mut opening = Message::new();
        opening.insert("version", PROTOCOL_VERSION);

        let (result, observed_reply) = run_against(opening).await;
        assert!(result.unwrap());
        assert_eq!(observed_reply, reply());
    }

    #[tokio::test]
    async fn mismatched_version_is_rejected_but_still_replied() {
        let mut opening = Message::new();
        opening.insert("version", 0.1);

        let (result, observed_reply) = run_against(opening).await;
        assert!(!result.unwrap());
        assert_eq!(observed_reply, reply());
    }

    #[tokio::test]
    async fn missing_version_key_is_rejected() {
        let mut opening = Message::new();
        opening.insert("magic", "pr7d68j1");

        let (result, observed_reply) = run_against(opening).await;
        assert!(!result.unwrap());
        assert_eq!(observed_reply, reply());
    }

    #[tokio::test]
    async fn undecodable_opening_aborts_without_reply() {
        let (client, mut server) = duplex(4096);
        let ep = ServerEndpoint::new("test", 1);

        use tokio::io::AsyncWriteExt;
        server.write_all(b"!!garbage!!").await.unwrap();
        server.shutdown().await.unwrap();

        let mut chan = MessageChannel::new(client, ep);
        assert!(matches!(perform(&mut chan).await, Err(PtzError::Decode(_))));
    }
}
