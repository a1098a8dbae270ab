//! Replay front-end for the interception pipeline.
//!
//! Reads exchanges recorded as JSON lines, runs them through a pipeline built
//! by `client-bootstrap`, and writes the intercepted exchanges and any
//! notifications back out as JSON lines.
pub mod capture;
pub mod replay;
pub mod sink;

pub use capture::{CapturedExchange, CapturedRequest};
pub use replay::{Replay, ReplaySummary, replay};
pub use sink::JsonLinesSink;
