//! Request payloads sent by connection workers
//!
//! A [`RequestSpec`] is built once per campaign and shared read-only by
//! every worker. Payloads come from the command line (with escape
//! sequences), from a file, or from one of the built-in [`Preset`]s.

pub mod escape;
pub mod preset;
pub mod spec;

pub use escape::decode_escapes;
pub use preset::Preset;
pub use spec::{END_OF_HEADERS, RequestSpec};
