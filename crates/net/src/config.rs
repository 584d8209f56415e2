//! Network configuration read from the environment.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::types::DEFAULT_PORT;

/// Where to listen (when hosting) and where to log wire traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Bind address when hosting.
    pub host: String,
    pub port: u16,
    /// Append every line sent or received to this file as JSON records.
    pub wire_log_path: Option<PathBuf>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            wire_log_path: None,
        }
    }
}

impl NetConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_DUEL_HOST`: bind address (default `0.0.0.0`)
    /// - `TETRIS_DUEL_PORT`: port (default 7777)
    /// - `TETRIS_DUEL_WIRE_LOG`: optional wire log path
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TETRIS_DUEL_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port = env::var("TETRIS_DUEL_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let wire_log_path = env::var("TETRIS_DUEL_WIRE_LOG")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            host,
            port,
            wire_log_path,
        }
    }

    /// Loopback config on an OS-assigned port.
    pub fn loopback() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            wire_log_path: None,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Resolve a peer address typed by the user, adding `default_port` when the
/// input has no port.
pub fn resolve_peer(input: &str, default_port: u16) -> anyhow::Result<SocketAddr> {
    let input = input.trim();
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let with_port = if input.contains(':') {
        input.to_string()
    } else {
        format!("{input}:{default_port}")
    };

    with_port
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {with_port}"))?
        .next()
        .ok_or_else(|| anyhow!("no address found for {with_port}"))
}
