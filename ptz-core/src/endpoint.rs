//! Server endpoint description.

use std::fmt;

/// Default port of the PTZ rig control service.
pub const DEFAULT_PORT: u16 = 50201;

/// Default host name of the PTZ rig control service.
///
/// A symbolic name resolved by the surrounding network, deliberately
/// not a literal IP.
pub const DEFAULT_HOST: &str = "fc0";

/// Address of the PTZ rig control service. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    host: String,
    port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` form accepted by `TcpStream::connect`.
    pub fn to_socket_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_socket_string() {
        let ep = ServerEndpoint::new("10.0.0.7", 4321);
        assert_eq!(ep.to_string(), "10.0.0.7:4321");
        assert_eq!(ep.to_socket_string(), "10.0.0.7:4321");
    }

    #[test]
    fn default_endpoint() {
        let ep = ServerEndpoint::default();
        assert_eq!(ep.host(), "fc0");
        assert_eq!(ep.port(), 50201);
    }
}
