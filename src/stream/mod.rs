//! Stream transport abstraction
//!
//! Workers talk to the target through a [`StreamProtocol`], so the same
//! wave machinery can drive any connection-oriented socket type.

pub mod protocol;

pub use protocol::StreamProtocol;
