use crate::{Result, StormError};
use std::time::Duration;

/// Timeouts and size limits applied to a single connection
///
/// # Examples
///
/// ```
/// use wavestorm::worker::WorkerConfig;
/// use std::time::Duration;
///
/// let config = WorkerConfig::default()
///     .with_deadline(Duration::from_secs(2))
///     .with_max_response_bytes(4096);
///
/// assert_eq!(config.read_buffer_size, 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Upper bound for establishing the connection
    pub connect_timeout: Duration,
    /// Upper bound for a single read to produce data
    pub idle_timeout: Duration,
    /// Upper bound for the whole exchange, measured from worker start
    pub deadline: Duration,
    /// Size of each read
    pub read_buffer_size: usize,
    /// Reading stops once this many response bytes have been collected
    pub max_response_bytes: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(1),
            deadline: Duration::from_secs(1),
            read_buffer_size: 1024,
            max_response_bytes: 16 * 1024,
        }
    }
}

impl WorkerConfig {
    /// Uses `timeout` for connect, idle reads and the overall deadline
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            idle_timeout: timeout,
            deadline: timeout,
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    pub fn with_max_response_bytes(mut self, size: usize) -> Self {
        self.max_response_bytes = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.deadline.is_zero() {
            return Err(StormError::Config("per-worker timeout must be positive".to_string()));
        }
        if self.connect_timeout.is_zero() || self.idle_timeout.is_zero() {
            return Err(StormError::Config(
                "connect and idle timeouts must be positive".to_string(),
            ));
        }
        if self.read_buffer_size == 0 || self.max_response_bytes == 0 {
            return Err(StormError::Config(
                "read buffer size and response cap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout_sets_all_bounds() {
        let config = WorkerConfig::with_timeout(Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.idle_timeout, Duration::from_millis(250));
        assert_eq!(config.deadline, Duration::from_millis(250));
        assert_eq!(config.max_response_bytes, 16 * 1024);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(WorkerConfig::default().with_deadline(Duration::ZERO).validate().is_err());
        assert!(WorkerConfig::default().with_idle_timeout(Duration::ZERO).validate().is_err());
        assert!(WorkerConfig::default().with_max_response_bytes(0).validate().is_err());
        assert!(WorkerConfig::default().with_read_buffer_size(0).validate().is_err());
    }
}
