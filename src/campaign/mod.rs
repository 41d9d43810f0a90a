//! Campaign driver
//!
//! A campaign resolves the target once and then runs its waves strictly
//! one after another, collecting a [`WaveReport`](crate::WaveReport) per
//! wave. Connection failures are data here; only configuration problems
//! stop a campaign.

pub mod config;
pub mod driver;
pub mod report;

#[cfg(test)]
mod tests;

pub use config::CampaignConfig;
pub use driver::Campaign;
pub use report::CampaignReport;
