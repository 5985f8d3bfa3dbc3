//! Discord Rich Presence integration using discord-sdk

use std::sync::Arc;
use std::time::Duration;

use discord_sdk::{
    activity::{ActivityBuilder, Assets},
    registration::{Application, LaunchCommand},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::sync::mpsc;

use crate::presence::{PresencePayload, PresenceProvider};
use crate::settings::PresenceSettings;

/// Discord Application ID for BeatPresence
pub const DISCORD_APP_ID: i64 = 736414005190721566;

/// Steam App ID of Beat Saber, used so Discord can launch the game
pub const BEAT_SABER_STEAM_APP_ID: u32 = 620980;

enum DiscordUpdate {
    Activity(PresencePayload),
    Clear,
}

/// Static parts of every activity
#[derive(Debug, Clone)]
struct ActivityTemplate {
    large_image_key: String,
    large_image_text: String,
}

/// Everything an activity shows, resolved from a payload
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivityParts {
    details: String,
    state: String,
    large_image: (String, String),
    small_image: Option<(String, String)>,
    end_timestamp: Option<i64>,
}

impl ActivityTemplate {
    fn parts(&self, payload: &PresencePayload, now: i64) -> ActivityParts {
        ActivityParts {
            details: payload.details.clone(),
            state: payload.state.clone(),
            large_image: (self.large_image_key.clone(), self.large_image_text.clone()),
            small_image: payload.has_small_asset().then(|| {
                (
                    payload.small_asset_key.clone(),
                    payload.small_asset_label.clone(),
                )
            }),
            end_timestamp: countdown_visible(payload, now)
                .then_some(payload.end_timestamp_epoch_seconds),
        }
    }

    fn build(&self, payload: &PresencePayload, now: i64) -> ActivityBuilder {
        let parts = self.parts(payload, now);

        let (large_key, large_text) = parts.large_image;
        let mut assets = Assets::default().large(large_key, Some(large_text));
        if let Some((small_key, small_text)) = parts.small_image {
            assets = assets.small(small_key, Some(small_text));
        }

        let mut activity = ActivityBuilder::new()
            .details(parts.details)
            .state(parts.state)
            .assets(assets);

        if let Some(end) = parts.end_timestamp {
            activity = activity.end_timestamp(end);
        }

        activity
    }
}

/// A countdown is only shown while its end lies in the future
fn countdown_visible(payload: &PresencePayload, now: i64) -> bool {
    payload.has_countdown() && payload.end_timestamp_epoch_seconds > now
}

/// Manages the Discord connection and background task
pub struct DiscordState {
    update_tx: mpsc::UnboundedSender<DiscordUpdate>,
}

impl DiscordState {
    /// Initialize Discord integration
    ///
    /// This registers the application with Discord and spawns a background task
    /// to manage the Discord connection and presence updates.
    pub async fn init(settings: &PresenceSettings) -> Result<Self, discord_sdk::Error> {
        // Register app with Discord (allows Discord to launch via Steam)
        if let Err(e) = discord_sdk::registration::register_app(Application {
            id: settings.app_id,
            name: Some("Beat Saber".to_string()),
            command: LaunchCommand::Steam(BEAT_SABER_STEAM_APP_ID),
        }) {
            tracing::warn!("Failed to register Discord app: {:?}", e);
        }

        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let template = ActivityTemplate {
            large_image_key: settings.large_image_key.clone(),
            large_image_text: settings.large_image_text.clone(),
        };

        tokio::spawn(Self::run_discord_task(
            settings.app_id,
            Duration::from_secs(settings.handshake_timeout_secs),
            template,
            update_rx,
        ));

        Ok(Self { update_tx })
    }

    /// Background task that maintains the Discord connection and processes presence updates
    async fn run_discord_task(
        app_id: i64,
        handshake_timeout: Duration,
        template: ActivityTemplate,
        mut update_rx: mpsc::UnboundedReceiver<DiscordUpdate>,
    ) {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));

        let mut user_spoke = wheel.user();

        let discord = match Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler)) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Discord not available: {:?}", e);
                return;
            }
        };

        tracing::info!("Discord connecting...");

        let user = match tokio::time::timeout(handshake_timeout, async {
            if user_spoke.0.changed().await.is_err() {
                Err("Discord connection closed".to_string())
            } else {
                match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.clone()),
                    UserState::Disconnected(err) => Err(format!("Discord disconnected: {:?}", err)),
                }
            }
        })
        .await
        {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                tracing::warn!("{}", e);
                return;
            }
            Err(_) => {
                tracing::warn!("Discord handshake timed out");
                return;
            }
        };

        tracing::info!("Discord Rich Presence connected as {}", user.username);

        while let Some(update) = update_rx.recv().await {
            let result = match update {
                DiscordUpdate::Activity(payload) => {
                    let now = chrono::Utc::now().timestamp();
                    discord
                        .update_activity(template.build(&payload, now))
                        .await
                        .map(|_| ())
                }
                DiscordUpdate::Clear => discord.clear_activity().await.map(|_| ()),
            };

            if let Err(e) = result {
                tracing::debug!("Failed to update Discord activity: {:?}", e);
            }
        }

        discord.disconnect().await;
        tracing::info!("Discord Rich Presence disconnected");
    }

    fn send(&self, update: DiscordUpdate) {
        let _ = self.update_tx.send(update);
    }
}

/// Discord presence provider implementing the generic PresenceProvider trait
pub struct DiscordPresence {
    state: Arc<DiscordState>,
}

impl DiscordPresence {
    /// Create a new Discord presence provider
    pub fn new(state: Arc<DiscordState>) -> Self {
        Self { state }
    }
}

impl PresenceProvider for DiscordPresence {
    fn name(&self) -> &'static str {
        "Discord"
    }

    fn update_presence(&self, payload: &PresencePayload) {
        self.state.send(DiscordUpdate::Activity(payload.clone()));
    }

    fn clear_presence(&self) {
        self.state.send(DiscordUpdate::Clear);
    }
}
