//! Read-only fan-out of exchanges to observers.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use protocol::{Envelope, RequestType};
use tracing::{debug, trace, warn};

use super::{AttachToken, EnvelopeView, Observer};
use crate::error::FeatureError;

/// Predicate deciding whether an observer is shown an envelope.
pub struct EnvelopeFilter(Box<dyn Fn(&Envelope) -> bool + Send + Sync>);

impl EnvelopeFilter {
    pub fn new(predicate: impl Fn(&Envelope) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    /// Matches every envelope.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Matches envelopes carrying at least one request of `request_type`.
    pub fn request_type(request_type: RequestType) -> Self {
        Self::new(move |envelope| envelope.contains(request_type))
    }

    pub fn matches(&self, envelope: &Envelope) -> bool {
        (self.0)(envelope)
    }
}

impl fmt::Debug for EnvelopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnvelopeFilter(..)")
    }
}

/// One finished exchange: the envelope as received and as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    original: Envelope,
    intercepted: Envelope,
}

impl Exchange {
    pub fn new(original: Envelope, intercepted: Envelope) -> Self {
        Self {
            original,
            intercepted,
        }
    }

    /// Exchange that went through no mutation.
    pub fn unchanged(envelope: Envelope) -> Self {
        Self {
            original: envelope.clone(),
            intercepted: envelope,
        }
    }

    pub fn original(&self) -> &Envelope {
        &self.original
    }

    pub fn intercepted(&self) -> &Envelope {
        &self.intercepted
    }

    pub fn view(&self, view: EnvelopeView) -> &Envelope {
        match view {
            EnvelopeView::Original => &self.original,
            EnvelopeView::Intercepted => &self.intercepted,
        }
    }

    pub fn into_intercepted(self) -> Envelope {
        self.intercepted
    }
}

struct Subscription {
    token: AttachToken,
    filter: EnvelopeFilter,
    view: EnvelopeView,
    observer: Arc<dyn Observer>,
}

/// Push-based broadcast of exchanges to attached observers.
///
/// Publishing walks a snapshot of the subscription list taken at publish time.
/// Delivery is fire-and-forget: observer errors and panics are logged here and
/// never reach the publisher or the remaining observers.
pub struct InterceptionRelay {
    subscriptions: RwLock<Vec<Arc<Subscription>>>,
    next_token: AtomicU64,
}

impl InterceptionRelay {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    pub fn attach(
        &self,
        filter: EnvelopeFilter,
        view: EnvelopeView,
        observer: Arc<dyn Observer>,
    ) -> AttachToken {
        let token = AttachToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        debug!(
            target: "runtime::relay",
            observer = observer.name(),
            view = ?view,
            "Observer attached"
        );
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(Subscription {
                token,
                filter,
                view,
                observer,
            }));
        token
    }

    /// Detaches the observer registered under `token`. Deliveries already
    /// made are not retracted.
    pub fn detach(&self, token: AttachToken) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.token != token);
        before != subscriptions.len()
    }

    pub fn len(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `exchange` to every matching observer. Returns the number of
    /// observers that handled it without error.
    pub fn publish(&self, exchange: &Exchange) -> usize {
        let subscriptions = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut delivered = 0;
        for subscription in subscriptions.iter() {
            let envelope = exchange.view(subscription.view);
            let name = subscription.observer.name();

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                if !subscription.filter.matches(envelope) {
                    return Ok(false);
                }
                subscription.observer.on_envelope(envelope).map(|()| true)
            }))
            .unwrap_or_else(|payload| Err(FeatureError::from_panic(name, payload)));

            match outcome {
                Ok(true) => delivered += 1,
                Ok(false) => trace!(target: "runtime::relay", observer = name, "Filtered out"),
                Err(error) => warn!(
                    target: "runtime::relay",
                    observer = name,
                    error = %error,
                    "Observer failed"
                ),
            }
        }
        delivered
    }
}

impl Default for InterceptionRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use protocol::Request;

    use super::*;
    use crate::error::Result;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl Observer for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn on_envelope(&self, envelope: &Envelope) -> Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(envelope.response(0).unwrap_or_default().to_vec());
            Ok(())
        }
    }

    struct Failing;

    impl Observer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn on_envelope(&self, _: &Envelope) -> Result<()> {
            panic!("observer exploded");
        }
    }

    fn exchange() -> Exchange {
        let requests = vec![Request::new(RequestType::GetMapObjects, vec![])];
        Exchange::new(
            Envelope::new(requests.clone(), vec![vec![1]]).unwrap(),
            Envelope::new(requests, vec![vec![2]]).unwrap(),
        )
    }

    #[test]
    fn observers_see_their_configured_view() {
        let relay = InterceptionRelay::new();
        let original = Arc::new(Recorder::default());
        let intercepted = Arc::new(Recorder::default());
        relay.attach(EnvelopeFilter::any(), EnvelopeView::Original, original.clone());
        relay.attach(EnvelopeFilter::any(), EnvelopeView::Intercepted, intercepted.clone());

        assert_eq!(relay.publish(&exchange()), 2);
        assert_eq!(*original.seen.lock().unwrap(), vec![vec![1]]);
        assert_eq!(*intercepted.seen.lock().unwrap(), vec![vec![2]]);
    }

    #[test]
    fn filter_excludes_unrelated_envelopes() {
        let relay = InterceptionRelay::new();
        let recorder = Arc::new(Recorder::default());
        relay.attach(
            EnvelopeFilter::request_type(RequestType::GetInventory),
            EnvelopeView::Intercepted,
            recorder.clone(),
        );

        assert_eq!(relay.publish(&exchange()), 0);
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn failing_observer_does_not_block_others() {
        let relay = InterceptionRelay::new();
        let recorder = Arc::new(Recorder::default());
        relay.attach(EnvelopeFilter::any(), EnvelopeView::Intercepted, Arc::new(Failing));
        relay.attach(EnvelopeFilter::any(), EnvelopeView::Intercepted, recorder.clone());

        assert_eq!(relay.publish(&exchange()), 1);
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn detached_observer_receives_nothing() {
        let relay = InterceptionRelay::new();
        let recorder = Arc::new(Recorder::default());
        let token = relay.attach(EnvelopeFilter::any(), EnvelopeView::Intercepted, recorder.clone());

        relay.publish(&exchange());
        assert!(relay.detach(token));
        relay.publish(&exchange());

        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
        assert!(relay.is_empty());
    }
}
