//! Entry point invoked once per request/response exchange.

use std::sync::Arc;

use protocol::Envelope;
use tracing::trace;

use crate::intercept::{Exchange, InterceptionProvider, InterceptionRelay};

/// Runs every attached mutator over an envelope, then publishes the exchange
/// to attached observers.
///
/// The returned envelope always carries the same request list as the input.
#[derive(Clone)]
pub struct Interceptor {
    provider: Arc<InterceptionProvider>,
    relay: Arc<InterceptionRelay>,
}

impl Interceptor {
    pub fn new(provider: Arc<InterceptionProvider>, relay: Arc<InterceptionRelay>) -> Self {
        Self { provider, relay }
    }

    pub fn provider(&self) -> &Arc<InterceptionProvider> {
        &self.provider
    }

    pub fn relay(&self) -> &Arc<InterceptionRelay> {
        &self.relay
    }

    pub fn on_exchange(&self, envelope: Envelope) -> Envelope {
        if self.relay.is_empty() {
            return self.provider.intercept(envelope);
        }

        let intercepted = self.provider.intercept(envelope.clone());
        let exchange = Exchange::new(envelope, intercepted);
        let delivered = self.relay.publish(&exchange);
        trace!(target: "runtime::interceptor", delivered, "Exchange published");
        exchange.into_intercepted()
    }
}
