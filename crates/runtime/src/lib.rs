//! Interception runtime for client/server envelope exchanges.
//!
//! The runtime sits between the network layer and the client: every finished
//! exchange is handed to [`Interceptor::on_exchange`], which lets attached
//! features rewrite response payloads and then notifies read-only observers.
//!
//! Modules are organized by responsibility:
//! - [`intercept`] hosts the mutator provider and the observer relay
//! - [`features`] holds the user-toggleable features and their registry
//! - [`format`] renders nickname templates from [`stats::DerivedStats`]
//! - [`stats`] derives display statistics from creature snapshots
//! - [`events`] extracts publishable records and delivers notifications
pub mod error;
pub mod events;
pub mod features;
pub mod format;
pub mod intercept;
pub mod stats;

mod interceptor;

pub use error::{FeatureError, Result};
pub use events::{
    ChannelSink, ExtractError, JSON_MIME_TYPE, MapObjectsRecord, NearbyRecord, Notification,
    NotificationSink, WildRecord, extract_map_objects,
};
pub use features::{
    Broadcast, DEFAULT_RENAME_FORMAT, Feature, FeatureKind, FeatureRegistry,
    GET_MAP_OBJECTS_ACTION, InMemoryPreferences, MapObjectsObserver, Preferences, Rename,
    RenameMutator,
};
pub use format::{Template, format};
pub use intercept::{
    AttachToken, EnvelopeFilter, EnvelopeView, Exchange, InterceptionProvider, InterceptionRelay,
    Mutation, Observer, ResponseMutator,
};
pub use interceptor::Interceptor;
pub use stats::{DerivedStats, StandardStatProvider, StatError, StatProvider};
