//! Records derived from intercepted traffic and the sink they are sent to.

mod extractor;
mod record;
mod sink;

pub use extractor::{ExtractError, extract_map_objects};
pub use record::{MapObjectsRecord, NearbyRecord, WildRecord};
pub use sink::{ChannelSink, JSON_MIME_TYPE, Notification, NotificationSink};
