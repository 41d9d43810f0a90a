use crate::{Result, StormError};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::lookup_host;

/// Host and port of the server under test
///
/// The endpoint is fixed for the whole campaign and resolved exactly once,
/// before the first wave is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEndpoint {
    pub host: String,
    pub port: u16,
}

impl TargetEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Checks that the endpoint is well formed without touching the network
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(StormError::Config("target host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(StormError::Config("target port must not be 0".to_string()));
        }
        Ok(())
    }

    /// Resolves the endpoint to a single socket address
    ///
    /// IPv4 results win over IPv6 ones; otherwise the first address returned
    /// by the resolver is used.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        self.validate()?;

        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let addrs: Vec<SocketAddr> = lookup_host((host, self.port))
            .await
            .map_err(|e| StormError::Resolve {
                endpoint: self.to_string(),
                reason: e.to_string(),
            })?
            .collect();

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| StormError::Resolve {
                endpoint: self.to_string(),
                reason: "no addresses returned".to_string(),
            })
    }
}

impl Default for TargetEndpoint {
    fn default() -> Self {
        Self::new("localhost", 5555)
    }
}

impl fmt::Display for TargetEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl From<SocketAddr> for TargetEndpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}

impl FromStr for TargetEndpoint {
    type Err = StormError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| StormError::Config(format!("Invalid endpoint '{s}': expected host:port")))?;
        let port = port
            .parse::<u16>()
            .map_err(|e| StormError::Config(format!("Invalid port in endpoint '{s}': {e}")))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');

        let endpoint = Self::new(host, port);
        endpoint.validate()?;
        Ok(endpoint)
    }
}
