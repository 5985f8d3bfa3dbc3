use crate::game::GameplaySnapshot;

use super::payload::PresencePayload;

/// Failures raised by the host integration while collecting game state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Couldn't find {0}")]
    MissingHostObject(String),
}

/// Supplies the current gameplay snapshot from the running game
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> Result<GameplaySnapshot, HostError>;
}

/// Trait for presence providers (Discord, logging sinks, etc.)
pub trait PresenceProvider: Send + Sync {
    /// Returns the name of this presence provider (for logging)
    fn name(&self) -> &'static str;

    /// Publish a new payload. Fire-and-forget, failures are the provider's concern.
    fn update_presence(&self, payload: &PresencePayload);

    /// Clear all presence data
    fn clear_presence(&self);
}
