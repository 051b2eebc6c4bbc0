//! Utility modules.

pub mod timeout;

pub use timeout::{turn_stream_with_timeout, turn_with_timeout, with_timeout};
