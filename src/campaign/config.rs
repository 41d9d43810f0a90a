use crate::network::TargetEndpoint;
use crate::request::RequestSpec;
use crate::wave::WaveConfig;
use crate::worker::WorkerConfig;
use crate::{Result, StormError};
use std::time::Duration;

pub const DEFAULT_WORKERS_PER_WAVE: usize = 300;
pub const DEFAULT_WAVE_COUNT: usize = 10;
pub const DEFAULT_LAUNCH_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_PER_WORKER_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_JOIN_GRACE: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024;

/// Everything a campaign needs, fixed for the duration of the run
///
/// # Examples
///
/// ```
/// use wavestorm::{CampaignConfig, RequestSpec, TargetEndpoint};
/// use std::time::Duration;
///
/// let config = CampaignConfig::new(
///     TargetEndpoint::new("localhost", 5555),
///     RequestSpec::with_default_terminator("STOP\r\n\r\n"),
/// )
/// .with_workers_per_wave(50)
/// .with_wave_count(3)
/// .with_launch_delay(Duration::from_millis(10));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.wave_config().join_timeout, Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub endpoint: TargetEndpoint,
    pub request: RequestSpec,
    pub workers_per_wave: usize,
    pub wave_count: usize,
    /// Pause between consecutive worker launches within a wave
    pub launch_delay: Duration,
    /// Deadline for one worker's whole exchange
    pub per_worker_timeout: Duration,
    /// Connect bound; defaults to the per-worker timeout
    pub connect_timeout: Option<Duration>,
    /// Bound on a single read; defaults to the per-worker timeout
    pub idle_timeout: Option<Duration>,
    /// Extra time the scheduler waits beyond the worker deadline when joining
    pub join_grace: Duration,
    pub max_response_bytes: usize,
}

impl CampaignConfig {
    pub fn new(endpoint: TargetEndpoint, request: RequestSpec) -> Self {
        Self {
            endpoint,
            request,
            workers_per_wave: DEFAULT_WORKERS_PER_WAVE,
            wave_count: DEFAULT_WAVE_COUNT,
            launch_delay: DEFAULT_LAUNCH_DELAY,
            per_worker_timeout: DEFAULT_PER_WORKER_TIMEOUT,
            connect_timeout: None,
            idle_timeout: None,
            join_grace: DEFAULT_JOIN_GRACE,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_workers_per_wave(mut self, workers: usize) -> Self {
        self.workers_per_wave = workers;
        self
    }

    pub fn with_wave_count(mut self, waves: usize) -> Self {
        self.wave_count = waves;
        self
    }

    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    pub fn with_per_worker_timeout(mut self, timeout: Duration) -> Self {
        self.per_worker_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn with_join_grace(mut self, grace: Duration) -> Self {
        self.join_grace = grace;
        self
    }

    pub fn with_max_response_bytes(mut self, size: usize) -> Self {
        self.max_response_bytes = size;
        self
    }

    /// Settings handed to every connection worker
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::with_timeout(self.per_worker_timeout)
            .with_connect_timeout(self.connect_timeout.unwrap_or(self.per_worker_timeout))
            .with_idle_timeout(self.idle_timeout.unwrap_or(self.per_worker_timeout))
            .with_max_response_bytes(self.max_response_bytes)
    }

    /// Settings for each wave; the join waits out the worker deadline plus
    /// the grace period
    pub fn wave_config(&self) -> WaveConfig {
        WaveConfig::new(self.workers_per_wave)
            .with_launch_delay(self.launch_delay)
            .with_join_timeout(self.per_worker_timeout.saturating_add(self.join_grace))
    }

    /// Rejects configurations that must never reach the first wave
    pub fn validate(&self) -> Result<()> {
        self.endpoint.validate()?;
        self.request.validate()?;

        if self.workers_per_wave == 0 {
            return Err(StormError::Config("workers per wave must be positive".to_string()));
        }
        if self.wave_count == 0 {
            return Err(StormError::Config("wave count must be positive".to_string()));
        }

        self.worker_config().validate()
    }
}
