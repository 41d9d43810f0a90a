use thiserror::Error;

/// Error types for the wavestorm library
///
/// Only configuration and setup problems surface as errors. Failures of
/// individual connections are folded into [`WorkerResult`] values instead.
#[derive(Error, Debug)]
pub enum StormError {
    /// TCP-related errors (connect, read, write)
    #[error("TCP error: {0}")]
    Tcp(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target name could not be turned into a socket address
    #[error("Failed to resolve {endpoint}: {reason}")]
    Resolve { endpoint: String, reason: String },

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),
}

/// Result type for the wavestorm library
pub type Result<T> = std::result::Result<T, StormError>;

pub mod aggregate;
pub mod campaign;
pub mod common;
pub mod network;
pub mod request;
pub mod stream;
pub mod tcp;
pub mod wave;
pub mod worker;

// Re-export main types for convenience
pub use aggregate::{AggregateCounter, WaveTicket};
pub use campaign::{Campaign, CampaignConfig, CampaignReport};
pub use network::TargetEndpoint;
pub use request::{Preset, RequestSpec};
pub use stream::StreamProtocol;
pub use tcp::TcpProtocol;
pub use wave::{WaveConfig, WaveReport, WaveScheduler};
pub use worker::{ConnectionWorker, WorkerConfig, WorkerResult};
