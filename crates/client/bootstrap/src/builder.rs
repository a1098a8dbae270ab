//! Builds the interceptor, its features, and the preference store used by hosts.
use std::sync::Arc;

use runtime::{
    Broadcast, ChannelSink, FeatureKind, FeatureRegistry, InMemoryPreferences,
    InterceptionProvider, InterceptionRelay, Interceptor, NotificationSink, Rename,
    StandardStatProvider, StatProvider, Template,
};
use tracing::{info, warn};

use crate::config::InterceptorConfig;

/// Builder that assembles the pipeline, features, and preferences for hosts.
pub struct PipelineBuilder {
    config: InterceptorConfig,
    stats: Arc<dyn StatProvider>,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl PipelineBuilder {
    pub fn new(config: InterceptorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(StandardStatProvider),
            sink: None,
        }
    }

    /// Provide a custom stat provider.
    pub fn stat_provider(mut self, stats: impl StatProvider + 'static) -> Self {
        self.stats = Arc::new(stats);
        self
    }

    /// Send notifications to `sink` instead of an in-process channel.
    pub fn sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Wires every feature and activates those enabled in the configuration.
    pub fn build(self) -> PipelineSetup {
        let preferences = Arc::new(
            InMemoryPreferences::new().with_rename_format(self.config.rename.format.clone()),
        );
        preferences.set_enabled(FeatureKind::Rename, self.config.rename.enabled);
        preferences.set_enabled(FeatureKind::Broadcast, self.config.broadcast.enabled);

        if !Template::parse(&self.config.rename.format).has_directives() {
            warn!(
                format = %self.config.rename.format,
                "Rename format has no directives; every nickname becomes the same literal"
            );
        }

        let (sink, channel) = match self.sink {
            Some(sink) => (sink, None),
            None => {
                let channel = ChannelSink::with_capacity(self.config.notifications.capacity);
                (Arc::new(channel.clone()) as Arc<dyn NotificationSink>, Some(channel))
            }
        };

        let provider = Arc::new(InterceptionProvider::new());
        let relay = Arc::new(InterceptionRelay::new());

        let mut registry = FeatureRegistry::new(preferences.clone());
        registry.register(Arc::new(Rename::new(
            provider.clone(),
            self.stats,
            preferences.clone(),
        )));
        registry.register(Arc::new(
            Broadcast::new(relay.clone(), sink, preferences.clone())
                .with_view(self.config.broadcast.view),
        ));
        let active = registry.activate_enabled();

        info!(
            active,
            rename = self.config.rename.enabled,
            broadcast = self.config.broadcast.enabled,
            view = ?self.config.broadcast.view,
            "Interception pipeline ready"
        );

        PipelineSetup {
            config: self.config,
            preferences,
            interceptor: Interceptor::new(provider, relay),
            registry,
            channel,
        }
    }
}

pub struct PipelineSetup {
    pub config: InterceptorConfig,
    pub preferences: Arc<InMemoryPreferences>,
    pub interceptor: Interceptor,
    pub registry: FeatureRegistry,
    /// In-process notification channel, present unless a custom sink was set.
    pub channel: Option<ChannelSink>,
}

#[cfg(test)]
mod tests {
    use protocol::{Envelope, GetMapObjectsResponse, Message, Request, RequestType};

    use super::*;

    #[test]
    fn activates_features_from_config() {
        let mut config = InterceptorConfig::default();
        config.broadcast.enabled = false;

        let setup = PipelineBuilder::new(config).build();
        assert_eq!(setup.registry.active(), vec![FeatureKind::Rename]);
        assert_eq!(setup.interceptor.provider().len(), 1);
        assert!(setup.interceptor.relay().is_empty());
    }

    #[tokio::test]
    async fn default_sink_is_a_channel() {
        let setup = PipelineBuilder::new(InterceptorConfig::default()).build();
        let mut rx = setup.channel.as_ref().unwrap().subscribe();

        let envelope = Envelope::new(
            vec![Request::new(RequestType::GetMapObjects, vec![])],
            vec![GetMapObjectsResponse::default().encode().unwrap()],
        )
        .unwrap();
        setup.interceptor.on_exchange(envelope);

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.data, r#"{"wild":[],"nearby":[]}"#);
    }
}
