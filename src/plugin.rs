//! Plugin entry points invoked by the host when the mod is enabled or disabled

use std::sync::Arc;

use crate::discord::{DiscordPresence, DiscordState};
use crate::presence::{
    start_presence_background_task, BackgroundTask, EventSender, PresenceManager,
    PresenceProvider, SnapshotSource,
};
use crate::settings::PresenceSettings;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Failed to initialize Discord: {0:?}")]
    Discord(discord_sdk::Error),
}

impl From<discord_sdk::Error> for PluginError {
    fn from(e: discord_sdk::Error) -> Self {
        Self::Discord(e)
    }
}

/// A running plugin instance
pub struct BeatPresence {
    events: EventSender,
    task: BackgroundTask,
    manager: Arc<PresenceManager>,
}

impl BeatPresence {
    /// Connect to Discord and start processing lifecycle events.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn enable(
        settings: &PresenceSettings,
        source: Arc<dyn SnapshotSource>,
    ) -> Result<Self, PluginError> {
        let mut providers: Vec<Box<dyn PresenceProvider>> = Vec::new();

        if settings.enabled {
            let discord = Arc::new(DiscordState::init(settings).await?);
            providers.push(Box::new(DiscordPresence::new(discord)));
        } else {
            tracing::info!("Discord presence disabled in settings");
        }

        Ok(Self::with_providers(source, providers))
    }

    /// Start with an explicit set of providers instead of Discord
    pub fn with_providers(
        source: Arc<dyn SnapshotSource>,
        providers: Vec<Box<dyn PresenceProvider>>,
    ) -> Self {
        let mut manager = PresenceManager::new(source);
        for provider in providers {
            manager.add_provider(provider);
        }
        let manager = Arc::new(manager);

        let (events, task) = start_presence_background_task(manager.clone());
        tracing::info!("BeatPresence enabled");

        Self {
            events,
            task,
            manager,
        }
    }

    /// Handle the host uses to deliver lifecycle events
    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    pub fn manager(&self) -> &Arc<PresenceManager> {
        &self.manager
    }

    /// Stop processing events and clear the presence.
    ///
    /// Events queued before this call are still applied. Senders handed out by
    /// [`BeatPresence::events`] are refused afterwards.
    pub async fn disable(self) {
        drop(self.events);
        if let Err(e) = self.task.stop().await {
            tracing::error!("Presence task failed: {}", e);
        }
        tracing::info!("BeatPresence disabled");
    }
}
