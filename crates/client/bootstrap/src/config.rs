//! Interceptor configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use runtime::{DEFAULT_RENAME_FORMAT, EnvelopeView};

/// Configuration required to assemble an interception pipeline.
#[derive(Clone, Debug, Default)]
pub struct InterceptorConfig {
    pub rename: RenameConfig,
    pub broadcast: BroadcastConfig,
    pub notifications: NotificationConfig,
    pub log_dir: Option<PathBuf>,
}

impl InterceptorConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RENAME_ENABLED` - Enable the rename feature (default: true)
    /// - `RENAME_FORMAT` - Nickname template (default: `%IVP% %LVLP%`)
    /// - `BROADCAST_ENABLED` - Enable map-object broadcasts (default: true)
    /// - `BROADCAST_VIEW` - `original` or `intercepted` (default: intercepted)
    /// - `NOTIFICATION_CAPACITY` - Notification channel capacity (default: 64)
    /// - `LOG_DIR` - Also write logs to this directory (default: unset)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(enabled) = parse::<bool>(&lookup, "RENAME_ENABLED") {
            config.rename.enabled = enabled;
        }
        if let Some(format) = lookup("RENAME_FORMAT").filter(|f| !f.is_empty()) {
            config.rename.format = format;
        }

        if let Some(enabled) = parse::<bool>(&lookup, "BROADCAST_ENABLED") {
            config.broadcast.enabled = enabled;
        }
        if let Some(view) = lookup("BROADCAST_VIEW") {
            config.broadcast.view = view
                .parse()
                .map_err(|err| anyhow!("invalid BROADCAST_VIEW: {err}"))?;
        }

        if let Some(capacity) = parse::<usize>(&lookup, "NOTIFICATION_CAPACITY") {
            config.notifications.capacity = capacity.max(1);
        }

        config.log_dir = lookup("LOG_DIR").filter(|d| !d.is_empty()).map(PathBuf::from);

        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct RenameConfig {
    pub enabled: bool,
    pub format: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: DEFAULT_RENAME_FORMAT.to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BroadcastConfig {
    pub enabled: bool,
    pub view: EnvelopeView,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            view: EnvelopeView::Intercepted,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<InterceptorConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InterceptorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert!(config.rename.enabled);
        assert_eq!(config.rename.format, "%IVP% %LVLP%");
        assert!(config.broadcast.enabled);
        assert_eq!(config.broadcast.view, EnvelopeView::Intercepted);
        assert_eq!(config.notifications.capacity, 64);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("RENAME_ENABLED", "false"),
            ("RENAME_FORMAT", "%NICK.4% %IV%"),
            ("BROADCAST_VIEW", "original"),
            ("NOTIFICATION_CAPACITY", "0"),
            ("LOG_DIR", "/var/log/interceptor"),
        ])
        .unwrap();

        assert!(!config.rename.enabled);
        assert_eq!(config.rename.format, "%NICK.4% %IV%");
        assert_eq!(config.broadcast.view, EnvelopeView::Original);
        assert_eq!(config.notifications.capacity, 1);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/interceptor")));
    }

    #[test]
    fn unparsable_toggles_keep_defaults() {
        let config = load(&[("BROADCAST_ENABLED", "maybe")]).unwrap();
        assert!(config.broadcast.enabled);
    }

    #[test]
    fn unknown_view_is_an_error() {
        let err = load(&[("BROADCAST_VIEW", "both")]).unwrap_err();
        assert!(err.to_string().contains("BROADCAST_VIEW"));
    }
}
