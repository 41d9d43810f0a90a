//! Shared helpers
//!
//! `test_utils` holds loopback targets used by unit and integration tests
//! to stand in for the server under test.

pub mod test_utils;

pub use test_utils::{
    refused_endpoint, spawn_closing_target, spawn_echo_target, spawn_http_target,
    spawn_silent_target,
};
