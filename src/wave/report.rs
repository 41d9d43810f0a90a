use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

/// Outcome of one completed wave
#[derive(Debug, Clone, Serialize)]
pub struct WaveReport {
    /// 1-based position of the wave in its campaign
    pub wave_index: usize,
    pub launched: usize,
    pub failures: u64,
    /// Workers still running when their join timed out
    pub unjoined: usize,
    #[serde(skip)]
    pub started_at: Instant,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl WaveReport {
    pub fn finished_at(&self) -> Instant {
        self.started_at + self.elapsed
    }

    pub fn succeeded(&self) -> u64 {
        (self.launched as u64).saturating_sub(self.failures)
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
