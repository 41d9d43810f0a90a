use crate::wave::WaveReport;
use serde::Serialize;

/// All wave reports of a finished campaign
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub waves: Vec<WaveReport>,
    /// Failures that arrived after their wave had already been reported
    pub late_discarded: u64,
}

impl CampaignReport {
    pub fn total_launched(&self) -> usize {
        self.waves.iter().map(|w| w.launched).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.waves.iter().map(|w| w.failures).sum()
    }
}
