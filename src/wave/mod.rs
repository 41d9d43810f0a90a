//! Wave scheduling
//!
//! A wave launches a fixed number of connection workers at a fixed pace,
//! waits for them with a bounded join and reports how many failed.

pub mod config;
pub mod report;
pub mod scheduler;


pub use config::WaveConfig;
pub use report::WaveReport;
pub use scheduler::WaveScheduler;
