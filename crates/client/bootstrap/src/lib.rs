//! Shared bootstrap utilities for interceptor front-ends.
//!
//! Provides configuration loading and pipeline assembly that can be reused by
//! the replay CLI or any other host embedding the interceptor.
pub mod builder;
pub mod config;

pub use builder::{PipelineBuilder, PipelineSetup};
pub use config::InterceptorConfig;
