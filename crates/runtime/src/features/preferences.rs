//! Feature toggles and the user's rename format.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use super::FeatureKind;

/// Rename format used when the user has not configured one.
pub const DEFAULT_RENAME_FORMAT: &str = "%IVP% %LVLP%";

/// Read side of the user's preferences.
///
/// Queried when features are activated and again on every envelope, so
/// implementations must be cheap and may change between calls.
pub trait Preferences: Send + Sync {
    fn is_enabled(&self, feature: FeatureKind) -> bool;

    fn rename_format(&self) -> String;
}

/// Preferences held in memory and adjustable at runtime.
#[derive(Debug)]
pub struct InMemoryPreferences {
    rename: AtomicBool,
    broadcast: AtomicBool,
    rename_format: RwLock<String>,
}

impl InMemoryPreferences {
    /// All features enabled, default rename format.
    pub fn new() -> Self {
        Self {
            rename: AtomicBool::new(true),
            broadcast: AtomicBool::new(true),
            rename_format: RwLock::new(DEFAULT_RENAME_FORMAT.to_owned()),
        }
    }

    pub fn with_rename_format(self, format: impl Into<String>) -> Self {
        self.set_rename_format(format);
        self
    }

    pub fn set_enabled(&self, feature: FeatureKind, enabled: bool) {
        self.flag(feature).store(enabled, Ordering::Release);
    }

    pub fn set_rename_format(&self, format: impl Into<String>) {
        *self
            .rename_format
            .write()
            .unwrap_or_else(PoisonError::into_inner) = format.into();
    }

    fn flag(&self, feature: FeatureKind) -> &AtomicBool {
        match feature {
            FeatureKind::Rename => &self.rename,
            FeatureKind::Broadcast => &self.broadcast,
        }
    }
}

impl Preferences for InMemoryPreferences {
    fn is_enabled(&self, feature: FeatureKind) -> bool {
        self.flag(feature).load(Ordering::Acquire)
    }

    fn rename_format(&self) -> String {
        self.rename_format
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for InMemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}
