use super::{WaveConfig, WaveReport};
use crate::aggregate::AggregateCounter;
use crate::request::RequestSpec;
use crate::stream::StreamProtocol;
use crate::tcp::TcpProtocol;
use crate::worker::{ConnectionWorker, WorkerConfig};
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout};
use tracing::{Instrument, debug, info, info_span, warn};

/// Launches one wave of connection workers and reports its failures
///
/// Workers are started one at a time with `launch_delay` between them.
/// Once all are launched, each handle is awaited for at most
/// `join_timeout`; a worker that is still running is left alone and its
/// eventual result is discarded by the counter. The counter is read and
/// reset together when the wave closes.
pub struct WaveScheduler<P: StreamProtocol = TcpProtocol> {
    addr: SocketAddr,
    request: Arc<RequestSpec>,
    worker_config: WorkerConfig,
    wave_config: WaveConfig,
    counter: Arc<AggregateCounter>,
    protocol: PhantomData<fn() -> P>,
}

impl<P: StreamProtocol + 'static> WaveScheduler<P> {
    pub fn new(
        addr: SocketAddr,
        request: Arc<RequestSpec>,
        worker_config: WorkerConfig,
        wave_config: WaveConfig,
    ) -> Self {
        Self {
            addr,
            request,
            worker_config,
            wave_config,
            counter: Arc::new(AggregateCounter::new()),
            protocol: PhantomData,
        }
    }

    /// Shares an existing counter instead of creating a private one
    pub fn with_counter(mut self, counter: Arc<AggregateCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn counter(&self) -> &Arc<AggregateCounter> {
        &self.counter
    }

    pub fn wave_config(&self) -> &WaveConfig {
        &self.wave_config
    }

    /// Runs a complete wave: launch, join, report, reset
    pub async fn run_wave(&self, wave_index: usize) -> WaveReport {
        let span = info_span!("wave", index = wave_index);
        self.launch_and_join(wave_index).instrument(span).await
    }

    async fn launch_and_join(&self, wave_index: usize) -> WaveReport {
        let started_at = Instant::now();
        let ticket = self.counter.ticket();
        let mut handles = Vec::with_capacity(self.wave_config.workers);

        for i in 0..self.wave_config.workers {
            if i > 0 && !self.wave_config.launch_delay.is_zero() {
                sleep(self.wave_config.launch_delay).await;
            }

            let worker = ConnectionWorker::<P>::new(
                self.addr,
                Arc::clone(&self.request),
                self.worker_config.clone(),
            );
            let ticket = ticket.clone();
            handles.push(tokio::spawn(async move {
                let result = worker.run().await;
                ticket.record(&result)
            }));
        }

        let launched = handles.len();
        info!(launched, "All workers launched");

        let mut unjoined = 0;
        for handle in handles {
            match timeout(self.wave_config.join_timeout, handle).await {
                Ok(Ok(recorded)) => {
                    debug!(?recorded, "Worker joined");
                }
                Ok(Err(e)) => {
                    // A worker that died without reporting still counts as failed
                    warn!(error = %e, "Worker task did not complete");
                    ticket.record_failure();
                }
                Err(_) => {
                    // Dropping the handle detaches the task; it keeps running
                    unjoined += 1;
                }
            }
        }

        if unjoined > 0 {
            warn!(
                unjoined,
                join_timeout = ?self.wave_config.join_timeout,
                "Workers still running after join timeout, late results will be discarded"
            );
        }

        let failures = self.counter.snapshot_and_reset();
        let report = WaveReport {
            wave_index,
            launched,
            failures,
            unjoined,
            started_at,
            elapsed: started_at.elapsed(),
        };

        info!(
            launched = report.launched,
            failures = report.failures,
            unjoined = report.unjoined,
            elapsed = ?report.elapsed,
            "Wave complete"
        );

        report
    }
}
