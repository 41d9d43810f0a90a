use super::{WorkerConfig, WorkerResult};
use crate::request::RequestSpec;
use crate::stream::StreamProtocol;
use crate::tcp::TcpProtocol;
use crate::{Result, StormError};
use bytes::BytesMut;
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::{Instant, timeout_at};

/// Drives one connection: connect, send the request, read the response,
/// close.
///
/// The stream lives inside [`run`](Self::run), so it is dropped (and the
/// socket closed) on every exit path, including when the task running the
/// worker is aborted. No step is retried.
///
/// # Examples
///
/// ```no_run
/// use wavestorm::{ConnectionWorker, RequestSpec, WorkerConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let request = Arc::new(RequestSpec::with_default_terminator("STOP\r\n\r\n"));
///     let worker: ConnectionWorker =
///         ConnectionWorker::new("127.0.0.1:5555".parse().unwrap(), request, WorkerConfig::default());
///
///     let result = worker.run().await;
///     println!("succeeded: {}", result.succeeded);
/// }
/// ```
pub struct ConnectionWorker<P: StreamProtocol = TcpProtocol> {
    addr: SocketAddr,
    request: Arc<RequestSpec>,
    config: WorkerConfig,
    protocol: PhantomData<fn() -> P>,
}

impl<P: StreamProtocol> ConnectionWorker<P> {
    pub fn new(addr: SocketAddr, request: Arc<RequestSpec>, config: WorkerConfig) -> Self {
        Self {
            addr,
            request,
            config,
            protocol: PhantomData,
        }
    }

    /// Performs the exchange and folds any error into the result
    pub async fn run(self) -> WorkerResult {
        match self.exchange().await {
            Ok(received) => WorkerResult::success(received),
            Err(e) => WorkerResult::failure(e.to_string()),
        }
    }

    async fn exchange(&self) -> Result<usize> {
        let started = Instant::now();
        let deadline = started + self.config.deadline;

        let connect_by = deadline.min(started + self.config.connect_timeout);
        let mut stream = timeout_at(connect_by, P::connect(self.addr))
            .await
            .map_err(|_| StormError::Timeout(format!("connect to {} timed out", self.addr)))??;

        timeout_at(deadline, P::write(&mut stream, &self.request.payload))
            .await
            .map_err(|_| StormError::Timeout("write timeout".to_string()))??;

        timeout_at(deadline, P::flush(&mut stream))
            .await
            .map_err(|_| StormError::Timeout("flush timeout".to_string()))??;

        let received = self.read_response(&mut stream, deadline).await?;

        // The peer may already be gone; dropping the stream closes it regardless
        let _ = timeout_at(deadline, P::shutdown(&mut stream)).await;

        Ok(received)
    }

    /// Reads until the peer closes, the terminator shows up, the cap is
    /// reached or the connection goes idle after some data arrived
    async fn read_response(&self, stream: &mut P::Stream, deadline: Instant) -> Result<usize> {
        let cap = self.config.max_response_bytes;
        let mut response = BytesMut::with_capacity(self.config.read_buffer_size.min(cap));
        let mut buffer = vec![0u8; self.config.read_buffer_size];

        loop {
            let idle_by = deadline.min(Instant::now() + self.config.idle_timeout);

            match timeout_at(idle_by, P::read(stream, &mut buffer)).await {
                Ok(Ok(0)) => {
                    // Graceful close, with or without a response
                    break;
                }
                Ok(Ok(n)) => {
                    let before = response.len();
                    let take = n.min(cap - before);
                    response.extend_from_slice(&buffer[..take]);

                    if response.len() >= cap || self.request.terminator_seen(&response, before) {
                        break;
                    }
                }
                Ok(Err(e)) => {
                    return Err(e);
                }
                Err(_) if !response.is_empty() => {
                    break;
                }
                Err(_) => {
                    return Err(StormError::Timeout(format!(
                        "no response from {} within {:?}",
                        self.addr,
                        self.config.idle_timeout.min(self.config.deadline)
                    )));
                }
            }
        }

        Ok(response.len())
    }
}
