//! Owner of every feature instance and its lifecycle.

use std::sync::Arc;

use tracing::{debug, info};

use super::{Feature, FeatureKind, Preferences};

/// Explicit registry of features.
///
/// Holds the only shared state of the pipeline: which features exist and,
/// through them, which attachments are live. [`FeatureRegistry::reset`]
/// returns everything to the inactive state.
pub struct FeatureRegistry {
    features: Vec<Arc<dyn Feature>>,
    preferences: Arc<dyn Preferences>,
}

impl FeatureRegistry {
    pub fn new(preferences: Arc<dyn Preferences>) -> Self {
        Self {
            features: Vec::new(),
            preferences,
        }
    }

    /// Adds a feature. A feature of the same kind is replaced after being
    /// deactivated.
    pub fn register(&mut self, feature: Arc<dyn Feature>) {
        let kind = feature.kind();
        if let Some(slot) = self.features.iter_mut().find(|f| f.kind() == kind) {
            slot.deactivate();
            *slot = feature;
        } else {
            self.features.push(feature);
        }
        debug!(target: "runtime::features", feature = %kind, "Feature registered");
    }

    /// Activates the features enabled in preferences and deactivates the rest.
    /// Returns the number of active features.
    pub fn activate_enabled(&self) -> usize {
        let mut active = 0;
        for feature in &self.features {
            if self.preferences.is_enabled(feature.kind()) {
                feature.activate();
                active += 1;
            } else {
                feature.deactivate();
            }
        }
        info!(
            target: "runtime::features",
            active,
            registered = self.features.len(),
            "Features synchronized with preferences"
        );
        active
    }

    pub fn deactivate_all(&self) {
        for feature in &self.features {
            feature.deactivate();
        }
    }

    /// Deactivates and forgets every feature.
    pub fn reset(&mut self) {
        self.deactivate_all();
        self.features.clear();
    }

    pub fn get(&self, kind: FeatureKind) -> Option<&Arc<dyn Feature>> {
        self.features.iter().find(|f| f.kind() == kind)
    }

    pub fn active(&self) -> Vec<FeatureKind> {
        self.features
            .iter()
            .filter(|f| f.is_active())
            .map(|f| f.kind())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Drop for FeatureRegistry {
    fn drop(&mut self) {
        self.deactivate_all();
    }
}
