use crate::{Result, StormError};
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

/// Binds an ephemeral loopback port and serves every connection with
/// `handler` on its own task until the returned handle is aborted
async fn spawn_target<F, Fut>(handler: F) -> Result<(JoinHandle<Result<()>>, SocketAddr)>
where
    F: Fn(TcpStream, SocketAddr) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| StormError::Config(format!("Failed to bind listener: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| StormError::Config(format!("Failed to get local address: {e}")))?;

    let handle = tokio::spawn(serve(listener, handler));

    Ok((handle, addr))
}

async fn serve<F, Fut>(listener: TcpListener, handler: F) -> Result<()>
where
    F: Fn(TcpStream, SocketAddr) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    loop {
        let (stream, peer) = listener.accept().await?;
        let span = info_span!("target_connection", %peer);
        let fut = handler(stream, peer);
        tokio::spawn(
            async move {
                if let Err(e) = fut.await {
                    warn!(error = %e, "Target connection failed");
                }
            }
            .instrument(span),
        );
    }
}

/// Echo target: writes back every chunk it reads until the client closes
pub async fn spawn_echo_target() -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    spawn_target(|mut stream, _peer| async move {
        let mut buffer = vec![0u8; 1024];
        loop {
            let n = stream.read(&mut buffer).await?;
            if n == 0 {
                debug!("Client closed connection");
                break;
            }
            stream.write_all(&buffer[..n]).await?;
            stream.flush().await?;
            debug!(size = n, "Echoed data");
        }
        Ok::<(), StormError>(())
    })
    .await
}

/// HTTP target: waits for a complete request head, answers `200 OK` and
/// closes the connection
pub async fn spawn_http_target() -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    spawn_target(|mut stream, _peer| async move {
        let mut request = Vec::with_capacity(1024);
        let mut buffer = vec![0u8; 1024];
        loop {
            let n = stream.read(&mut buffer).await?;
            if n == 0 {
                return Ok::<(), StormError>(());
            }
            request.extend_from_slice(&buffer[..n]);

            let mut headers = [httparse::EMPTY_HEADER; 32];
            let mut parsed = httparse::Request::new(&mut headers);
            match parsed.parse(&request) {
                Ok(httparse::Status::Complete(_)) => break,
                Ok(httparse::Status::Partial) => continue,
                Err(e) => {
                    stream
                        .write_all(b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n")
                        .await?;
                    return Err(StormError::Config(format!("malformed request: {e}")));
                }
            }
        }

        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
            .await?;
        stream.shutdown().await?;
        Ok::<(), StormError>(())
    })
    .await
}

/// Target that accepts and closes right away
///
/// The write half is shut down first and the request drained afterwards, so
/// the client sees an orderly FIN rather than a reset.
pub async fn spawn_closing_target() -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    spawn_target(|mut stream, _peer| async move {
        stream.shutdown().await?;
        let mut buffer = vec![0u8; 1024];
        while stream.read(&mut buffer).await? > 0 {}
        Ok::<(), StormError>(())
    })
    .await
}

/// Target that accepts and never answers
///
/// Each connection is reported on the returned channel once the client
/// has closed its side, which is how tests observe that workers release
/// their sockets.
pub async fn spawn_silent_target() -> Result<(
    JoinHandle<Result<()>>,
    SocketAddr,
    mpsc::UnboundedReceiver<SocketAddr>,
)> {
    let (released_tx, released_rx) = mpsc::unbounded_channel();
    let (handle, addr) = spawn_target(move |mut stream, peer| {
        let released_tx = released_tx.clone();
        async move {
            let mut buffer = vec![0u8; 1024];
            // Swallow the request, then wait for the client to hang up
            loop {
                match stream.read(&mut buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            let _ = released_tx.send(peer);
            Ok::<(), StormError>(())
        }
    })
    .await?;

    Ok((handle, addr, released_rx))
}

/// Returns a loopback address nobody is listening on
pub fn refused_endpoint() -> Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|e| StormError::Config(format!("Failed to bind listener: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| StormError::Config(format!("Failed to get local address: {e}")))?;
    drop(listener);
    Ok(addr)
}
