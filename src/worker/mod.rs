//! Connection workers
//!
//! A worker owns exactly one connection from open to close and reduces
//! everything that can go wrong on it to a [`WorkerResult`].

pub mod config;
pub mod connection;
pub mod result;


pub use config::WorkerConfig;
pub use connection::ConnectionWorker;
pub use result::WorkerResult;
