//! Interception pipeline for response envelopes.
//!
//! Features plug into the pipeline in one of two ways:
//!
//! - **Mutators** ([`ResponseMutator`]) attach to the [`InterceptionProvider`]
//!   and may rewrite response payloads before they reach the client.
//! - **Observers** ([`Observer`]) attach to the [`InterceptionRelay`] and
//!   receive a read-only view of every exchange that matches their filter.
//!
//! # Ordering
//!
//! Mutators run once per envelope, sorted by [`ResponseMutator::priority`]
//! (lower values first). Mutators sharing a priority run in attach order, and
//! re-attaching moves a mutator to the back of its priority band. Each mutator
//! receives the envelope produced by the one before it, so when two mutators
//! rewrite the same index the later one sees (and wins over) the earlier edit.
//!
//! # Failure containment
//!
//! A mutator or observer that errors or panics is logged and skipped. The
//! envelope it was handed flows on unchanged, and its attachment is kept.

mod provider;
mod relay;

pub use provider::InterceptionProvider;
pub use relay::{EnvelopeFilter, Exchange, InterceptionRelay};

use protocol::{Envelope, Request};

use crate::error::Result;

/// Handle returned by `attach`, required to detach again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachToken(u64);

impl AttachToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

/// Outcome of a single mutator pass over an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// The envelope is passed on as received.
    Unchanged,
    /// The envelope is replaced; the request list must be identical.
    Replaced(Envelope),
}

/// Which envelope an observer is shown for an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeView {
    /// The envelope as the server sent it.
    Original,
    /// The envelope after every mutator ran, as delivered to the client.
    #[default]
    Intercepted,
}

impl std::str::FromStr for EnvelopeView {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(EnvelopeView::Original),
            "intercepted" | "mutated" => Ok(EnvelopeView::Intercepted),
            other => Err(format!("unknown envelope view `{other}`")),
        }
    }
}

/// A feature permitted to rewrite response payloads.
pub trait ResponseMutator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Lower values run first. Defaults to `0`.
    fn priority(&self) -> i32 {
        0
    }

    /// Inspects `envelope` and returns either [`Mutation::Unchanged`] or a
    /// replacement envelope.
    ///
    /// `requests` is the request list of the exchange, identical to
    /// `envelope.requests()`; it is passed separately so implementations can
    /// scan request types without holding on to the envelope.
    fn mutate(&self, requests: &[Request], envelope: &Envelope) -> Result<Mutation>;
}

/// A read-only subscriber to the exchange stream.
pub trait Observer: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_envelope(&self, envelope: &Envelope) -> Result<()>;
}
