use crate::Result;
use std::future::Future;
use std::net::SocketAddr;

/// Trait for stream-based protocols (TCP, Unix streams, etc.)
///
/// This trait defines the client-side operations a connection worker
/// needs: open a stream, push the request, pull the response and close.
pub trait StreamProtocol {
    /// Stream type for this protocol
    type Stream: Send + 'static;

    /// Connects to a server at the given address
    fn connect(addr: SocketAddr) -> impl Future<Output = Result<Self::Stream>> + Send;

    /// Reads data from a stream
    fn read(
        stream: &mut Self::Stream,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize>> + Send;

    /// Writes the whole buffer to a stream
    fn write(stream: &mut Self::Stream, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Flushes a stream
    fn flush(stream: &mut Self::Stream) -> impl Future<Output = Result<()>> + Send;

    /// Shuts down the write half of a stream
    fn shutdown(stream: &mut Self::Stream) -> impl Future<Output = Result<()>> + Send;
}
