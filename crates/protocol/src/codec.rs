//! Binary codec for response payloads.
//!
//! Every typed message in this crate implements [`Message`] through a blanket
//! impl over serde. Payloads are encoded with bincode using variable-length
//! integers, a hard size limit, and strict trailing-byte rejection so that a
//! truncated or padded payload is reported as corrupt instead of silently
//! decoding into a partial value.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Upper bound on a single encoded message (4 MiB).
pub const MAX_MESSAGE_LEN: u64 = 4 * 1024 * 1024;

/// Errors raised while converting between typed messages and payload bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode {message}: {source}")]
    Decode {
        message: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode {message}: {source}")]
    Encode {
        message: &'static str,
        #[source]
        source: bincode::Error,
    },
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_MESSAGE_LEN)
        .reject_trailing_bytes()
}

/// A typed protocol message that can be decoded from, and encoded to, an
/// opaque response payload.
pub trait Message: Sized + Serialize + DeserializeOwned {
    /// Short message name used in error reports and logs.
    const NAME: &'static str;

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        options()
            .deserialize(bytes)
            .map_err(|source| CodecError::Decode {
                message: Self::NAME,
                source,
            })
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        options()
            .serialize(self)
            .map_err(|source| CodecError::Encode {
                message: Self::NAME,
                source,
            })
    }
}
