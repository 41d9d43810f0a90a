use std::time::Duration;

/// Shape of a single wave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveConfig {
    /// Number of workers launched per wave
    pub workers: usize,
    /// Pause between two consecutive launches
    pub launch_delay: Duration,
    /// How long the scheduler waits on each worker before moving on
    pub join_timeout: Duration,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            workers: 300,
            launch_delay: Duration::from_millis(100),
            join_timeout: Duration::from_millis(1500),
        }
    }
}

impl WaveConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }
}
