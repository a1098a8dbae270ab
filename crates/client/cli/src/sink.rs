//! Notification sink writing one JSON object per line.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use runtime::{Notification, NotificationSink};
use tracing::warn;

pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, notification: &Notification) -> anyhow::Result<()> {
        let line = serde_json::to_string(notification)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> NotificationSink for JsonLinesSink<W> {
    fn send(&self, notification: Notification) {
        if let Err(error) = self.write(&notification) {
            warn!(action = %notification.action, %error, "Failed to write notification");
        }
    }
}
