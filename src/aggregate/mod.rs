//! Per-wave failure accounting shared by all connection workers

pub mod counter;

pub use counter::{AggregateCounter, Recorded, WaveTicket};
