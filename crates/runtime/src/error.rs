//! Errors raised by features while handling a single envelope.
//!
//! None of these escape the pipeline. The provider and the relay log them at
//! their boundary and carry on with the next feature or observer.

use thiserror::Error;

use protocol::{CodecError, EnvelopeError};

use crate::events::ExtractError;

pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to serialize notification payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{feature} panicked: {message}")]
    Panicked {
        feature: &'static str,
        message: String,
    },
}

impl FeatureError {
    /// Builds a [`FeatureError::Panicked`] from a `catch_unwind` payload.
    pub(crate) fn from_panic(feature: &'static str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        FeatureError::Panicked { feature, message }
    }
}
