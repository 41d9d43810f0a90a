use crate::stream::StreamProtocol;
use crate::{Result, StormError};
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// TCP protocol implementation
pub struct TcpProtocol;

impl StreamProtocol for TcpProtocol {
    type Stream = TcpStream;

    fn connect(addr: SocketAddr) -> impl Future<Output = Result<TcpStream>> + Send {
        async move {
            let stream = TcpStream::connect(addr).await.map_err(StormError::Tcp)?;
            // Requests are small and sent in one go
            stream.set_nodelay(true).map_err(StormError::Tcp)?;
            Ok(stream)
        }
    }

    fn read(stream: &mut TcpStream, buffer: &mut [u8]) -> impl Future<Output = Result<usize>> + Send {
        async move { stream.read(buffer).await.map_err(StormError::Tcp) }
    }

    fn write(stream: &mut TcpStream, data: &[u8]) -> impl Future<Output = Result<()>> + Send {
        async move { stream.write_all(data).await.map_err(StormError::Tcp) }
    }

    fn flush(stream: &mut TcpStream) -> impl Future<Output = Result<()>> + Send {
        async move { stream.flush().await.map_err(StormError::Tcp) }
    }

    fn shutdown(stream: &mut TcpStream) -> impl Future<Output = Result<()>> + Send {
        async move { stream.shutdown().await.map_err(StormError::Tcp) }
    }
}
