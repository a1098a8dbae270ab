//! User-toggleable features layered on the interception pipeline.
//!
//! Every feature has the same two-state lifecycle:
//!
//! ```text
//! inactive --activate()--> active --deactivate()--> inactive
//! ```
//!
//! `activate()` detaches any previous attachment before attaching again, so
//! calling it repeatedly never stacks deliveries. `deactivate()` on an
//! inactive feature does nothing.
//!
//! Features come in two shapes:
//! - [`Rename`] is a mutating feature attached to the
//!   [`InterceptionProvider`](crate::intercept::InterceptionProvider).
//! - [`Broadcast`] is an observing feature attached to the
//!   [`InterceptionRelay`](crate::intercept::InterceptionRelay).

mod broadcast;
mod preferences;
mod registry;
mod rename;

pub use broadcast::{Broadcast, GET_MAP_OBJECTS_ACTION, MapObjectsObserver};
pub use preferences::{DEFAULT_RENAME_FORMAT, InMemoryPreferences, Preferences};
pub use registry::FeatureRegistry;
pub use rename::{Rename, RenameMutator};

use std::sync::{Mutex, PoisonError};

use strum::{Display, EnumIter, EnumString};

use crate::intercept::AttachToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    Rename,
    Broadcast,
}

/// Lifecycle contract shared by all features.
pub trait Feature: Send + Sync {
    fn kind(&self) -> FeatureKind;

    /// Attaches the feature, replacing any previous attachment.
    fn activate(&self);

    /// Detaches the feature. No-op when inactive.
    fn deactivate(&self);

    fn is_active(&self) -> bool;
}

/// Token slot holding a feature's current attachment.
///
/// The slot lock is held across attach/detach so concurrent lifecycle calls on
/// the same feature are serialized.
#[derive(Debug, Default)]
struct Attachment {
    token: Mutex<Option<AttachToken>>,
}

impl Attachment {
    fn replace(&self, attach: impl FnOnce() -> AttachToken, detach: impl FnOnce(AttachToken) -> bool) {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            detach(previous);
        }
        *slot = Some(attach());
    }

    fn release(&self, detach: impl FnOnce(AttachToken) -> bool) {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = slot.take() {
            detach(token);
        }
    }

    fn is_attached(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
