//! Ordered, mutating stage of the interception pipeline.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use protocol::Envelope;
use tracing::{debug, trace, warn};

use super::{AttachToken, Mutation, ResponseMutator};
use crate::error::FeatureError;

struct Entry {
    token: AttachToken,
    priority: i32,
    mutator: Arc<dyn ResponseMutator>,
}

/// Registry of attached mutators and the fold that applies them.
///
/// Attach and detach take a write lock; [`intercept`](Self::intercept) clones
/// the attached list under a read lock and runs the mutators without holding
/// it. An activation racing an in-flight envelope therefore only affects the
/// envelopes that follow.
pub struct InterceptionProvider {
    entries: RwLock<Vec<Arc<Entry>>>,
    next_token: AtomicU64,
}

impl InterceptionProvider {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Attaches a mutator behind every mutator of equal or lower priority.
    pub fn attach(&self, mutator: Arc<dyn ResponseMutator>) -> AttachToken {
        let token = AttachToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        let priority = mutator.priority();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let position = entries.partition_point(|entry| entry.priority <= priority);
        debug!(
            target: "runtime::provider",
            mutator = mutator.name(),
            priority,
            position,
            "Mutator attached"
        );
        entries.insert(
            position,
            Arc::new(Entry {
                token,
                priority,
                mutator,
            }),
        );
        token
    }

    /// Detaches the mutator registered under `token`.
    ///
    /// Returns `false` when the token is unknown (already detached).
    pub fn detach(&self, token: AttachToken) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter().position(|entry| entry.token == token) {
            Some(index) => {
                let entry = entries.remove(index);
                debug!(
                    target: "runtime::provider",
                    mutator = entry.mutator.name(),
                    "Mutator detached"
                );
                true
            }
            None => false,
        }
    }

    /// Number of attached mutators.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attached mutator names in execution order (for debugging).
    pub fn mutators(&self) -> Vec<&'static str> {
        self.snapshot()
            .iter()
            .map(|entry| entry.mutator.name())
            .collect()
    }

    /// Runs every attached mutator once, in order, folding their results.
    ///
    /// The returned envelope always satisfies the positional invariant and
    /// carries the same request list as `envelope`. A replacement that alters
    /// the request list is rejected and the previous envelope kept.
    pub fn intercept(&self, envelope: Envelope) -> Envelope {
        let entries = self.snapshot();
        if entries.is_empty() {
            return envelope;
        }

        let requests = envelope.requests().to_vec();
        let mut current = envelope;

        for entry in entries.iter() {
            let name = entry.mutator.name();
            let outcome = catch_unwind(AssertUnwindSafe(|| entry.mutator.mutate(&requests, &current)))
                .unwrap_or_else(|payload| Err(FeatureError::from_panic(name, payload)));

            match outcome {
                Ok(Mutation::Unchanged) => {
                    trace!(target: "runtime::provider", mutator = name, "No change");
                }
                Ok(Mutation::Replaced(next)) if next.requests() != requests.as_slice() => {
                    warn!(
                        target: "runtime::provider",
                        mutator = name,
                        expected = requests.len(),
                        actual = next.len(),
                        "Mutator altered the request list, replacement rejected"
                    );
                }
                Ok(Mutation::Replaced(next)) => {
                    trace!(target: "runtime::provider", mutator = name, "Envelope replaced");
                    current = next;
                }
                Err(error) => {
                    warn!(
                        target: "runtime::provider",
                        mutator = name,
                        error = %error,
                        "Mutator failed, continuing"
                    );
                }
            }
        }

        current
    }

    fn snapshot(&self) -> Vec<Arc<Entry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for InterceptionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use protocol::{Request, RequestType};

    use super::*;
    use crate::error::Result;

    /// Appends `tag` to every response at indices of `target` type.
    struct Append {
        name: &'static str,
        priority: i32,
        target: RequestType,
        tag: u8,
        calls: Mutex<usize>,
    }

    impl Append {
        fn new(name: &'static str, target: RequestType, tag: u8) -> Arc<Self> {
            Self::with_priority(name, target, tag, 0)
        }

        fn with_priority(name: &'static str, target: RequestType, tag: u8, priority: i32) -> Arc<Self> {
            Arc::new(Self {
                name,
                priority,
                target,
                tag,
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ResponseMutator for Append {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn mutate(&self, requests: &[Request], envelope: &Envelope) -> Result<Mutation> {
            *self.calls.lock().unwrap() += 1;
            let mut current = envelope.clone();
            let mut changed = false;
            for (index, request) in requests.iter().enumerate() {
                if request.request_type == self.target {
                    let mut bytes = current.response(index).unwrap().to_vec();
                    bytes.push(self.tag);
                    current = current.with_response(index, bytes)?;
                    changed = true;
                }
            }
            Ok(if changed {
                Mutation::Replaced(current)
            } else {
                Mutation::Unchanged
            })
        }
    }

    struct Panics;

    impl ResponseMutator for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn mutate(&self, _: &[Request], _: &Envelope) -> Result<Mutation> {
            panic!("boom");
        }
    }

    struct DropsEntries;

    impl ResponseMutator for DropsEntries {
        fn name(&self) -> &'static str {
            "drops"
        }

        fn mutate(&self, _: &[Request], _: &Envelope) -> Result<Mutation> {
            Ok(Mutation::Replaced(Envelope::new(vec![], vec![])?))
        }
    }

    fn envelope() -> Envelope {
        Envelope::new(
            vec![
                Request::new(RequestType::GetPlayer, vec![]),
                Request::new(RequestType::GetInventory, vec![]),
                Request::new(RequestType::GetMapObjects, vec![]),
            ],
            vec![vec![0], vec![1], vec![2]],
        )
        .unwrap()
    }

    #[test]
    fn empty_provider_returns_envelope_untouched() {
        let provider = InterceptionProvider::new();
        assert_eq!(provider.intercept(envelope()), envelope());
    }

    #[test]
    fn mutators_compose_in_attach_order() {
        let provider = InterceptionProvider::new();
        let first = Append::new("first", RequestType::GetInventory, 0xa);
        let second = Append::new("second", RequestType::GetInventory, 0xb);
        provider.attach(first.clone());
        provider.attach(second.clone());

        let out = provider.intercept(envelope());

        assert_eq!(out.response(1), Some(&[1, 0xa, 0xb][..]));
        assert_eq!(out.response(0), Some(&[0][..]));
        assert_eq!(out.response(2), Some(&[2][..]));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn priority_overrides_attach_order() {
        let provider = InterceptionProvider::new();
        provider.attach(Append::with_priority("late", RequestType::GetInventory, 0xb, 10));
        provider.attach(Append::with_priority("early", RequestType::GetInventory, 0xa, -10));
        provider.attach(Append::new("middle", RequestType::GetInventory, 0xc));

        assert_eq!(provider.mutators(), vec!["early", "middle", "late"]);
        let out = provider.intercept(envelope());
        assert_eq!(out.response(1), Some(&[1, 0xa, 0xc, 0xb][..]));
    }

    #[test]
    fn detach_stops_future_deliveries() {
        let provider = InterceptionProvider::new();
        let mutator = Append::new("append", RequestType::GetInventory, 0xa);
        let token = provider.attach(mutator.clone());

        assert!(provider.detach(token));
        assert!(!provider.detach(token));
        assert_eq!(provider.intercept(envelope()), envelope());
        assert_eq!(mutator.calls(), 0);
    }

    #[test]
    fn panicking_mutator_is_contained() {
        let provider = InterceptionProvider::new();
        provider.attach(Arc::new(Panics));
        provider.attach(Append::new("append", RequestType::GetMapObjects, 0xf));

        let out = provider.intercept(envelope());
        assert_eq!(out.response(2), Some(&[2, 0xf][..]));
        assert_eq!(provider.len(), 2);
    }

    #[test]
    fn replacement_with_different_requests_is_rejected() {
        let provider = InterceptionProvider::new();
        provider.attach(Arc::new(DropsEntries));

        let out = provider.intercept(envelope());
        assert_eq!(out, envelope());
    }
}
