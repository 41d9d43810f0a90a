//! Target addressing and name resolution

pub mod endpoint;

pub use endpoint::TargetEndpoint;
