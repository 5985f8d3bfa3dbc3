//! Discord Rich Presence for Beat Saber.
//!
//! The host mod loader forwards lifecycle events through an [`presence::EventSender`];
//! each event is turned into a [`presence::PresencePayload`] and published to every
//! registered [`presence::PresenceProvider`].

pub mod discord;
pub mod game;
pub mod logging;
pub mod plugin;
pub mod presence;
pub mod settings;

pub use game::{Characteristic, Difficulty, GameplaySnapshot, LifecycleEvent, Modifier};
pub use plugin::{BeatPresence, PluginError};
pub use presence::{PresencePayload, PresenceProvider, SnapshotSource};
pub use settings::PresenceSettings;
