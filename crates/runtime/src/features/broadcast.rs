//! Publishes map contents to external consumers.

use std::sync::Arc;

use protocol::{Envelope, GetMapObjectsResponse, Message, RequestType};
use tracing::debug;

use super::{Attachment, Feature, FeatureKind, Preferences};
use crate::error::Result;
use crate::events::{Notification, NotificationSink, extract_map_objects};
use crate::intercept::{EnvelopeFilter, EnvelopeView, InterceptionRelay, Observer};

/// Action identifier of map-object notifications.
pub const GET_MAP_OBJECTS_ACTION: &str = "com.icecream.snorlax.BROADCAST_GETMAPOBJECTS";

/// Observer that turns the first `GET_MAP_OBJECTS` response of an envelope
/// into a JSON notification.
pub struct MapObjectsObserver {
    sink: Arc<dyn NotificationSink>,
}

impl MapObjectsObserver {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }
}

impl Observer for MapObjectsObserver {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    fn on_envelope(&self, envelope: &Envelope) -> Result<()> {
        let Some(index) = envelope.positions(RequestType::GetMapObjects).next() else {
            return Ok(());
        };
        let Some(bytes) = envelope.response(index) else {
            return Ok(());
        };

        let response = GetMapObjectsResponse::decode(bytes)?;
        let record = extract_map_objects(&response)?;
        let notification = Notification::json(GET_MAP_OBJECTS_ACTION, &record)?;

        debug!(
            target: "runtime::broadcast",
            wild = record.wild.len(),
            nearby = record.nearby.len(),
            "Broadcasting map objects"
        );
        self.sink.send(notification);
        Ok(())
    }
}

/// Observing feature that forwards map contents to a [`NotificationSink`].
pub struct Broadcast {
    relay: Arc<InterceptionRelay>,
    observer: Arc<MapObjectsObserver>,
    preferences: Arc<dyn Preferences>,
    view: EnvelopeView,
    attachment: Attachment,
}

impl Broadcast {
    pub fn new(
        relay: Arc<InterceptionRelay>,
        sink: Arc<dyn NotificationSink>,
        preferences: Arc<dyn Preferences>,
    ) -> Self {
        Self {
            relay,
            observer: Arc::new(MapObjectsObserver::new(sink)),
            preferences,
            view: EnvelopeView::default(),
            attachment: Attachment::default(),
        }
    }

    /// Chooses whether notifications describe the envelope before or after
    /// mutation. Takes effect on the next `activate()`.
    pub fn with_view(mut self, view: EnvelopeView) -> Self {
        self.view = view;
        self
    }

    fn filter(&self) -> EnvelopeFilter {
        let preferences = self.preferences.clone();
        EnvelopeFilter::new(move |envelope| {
            preferences.is_enabled(FeatureKind::Broadcast)
                && envelope.contains(RequestType::GetMapObjects)
        })
    }
}

impl Feature for Broadcast {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Broadcast
    }

    fn activate(&self) {
        self.attachment.replace(
            || self.relay.attach(self.filter(), self.view, self.observer.clone()),
            |token| self.relay.detach(token),
        );
    }

    fn deactivate(&self) {
        self.attachment.release(|token| self.relay.detach(token));
    }

    fn is_active(&self) -> bool {
        self.attachment.is_attached()
    }
}
