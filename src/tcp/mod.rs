//! TCP transport for connection workers

pub mod protocol;


pub use protocol::TcpProtocol;
