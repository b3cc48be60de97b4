//! Connectivity signal
//!
//! Answers "is the network reachable right now". Only read after a live
//! analysis call has failed, to decide whether the offline cache applies.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Fixed answer, for tests and for forcing offline mode
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

/// Reports online when a TCP connection to the target opens within the timeout.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_online(&self) -> bool {
        let attempt = TcpStream::connect((self.host.as_str(), self.port));
        let online = matches!(tokio::time::timeout(self.timeout, attempt).await, Ok(Ok(_)));
        debug!(host = %self.host, port = self.port, online, "Connectivity probe");
        online
    }
}
