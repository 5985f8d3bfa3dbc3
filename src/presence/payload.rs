use serde::Serialize;

/// The status shown in a presence display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresencePayload {
    /// Primary line
    pub details: String,
    /// Secondary line
    pub state: String,
    pub small_asset_key: String,
    pub small_asset_label: String,
    /// Unix time at which the countdown ends, 0 when no countdown is shown
    pub end_timestamp_epoch_seconds: i64,
}

impl PresencePayload {
    pub fn has_small_asset(&self) -> bool {
        !self.small_asset_key.is_empty()
    }

    pub fn has_countdown(&self) -> bool {
        self.end_timestamp_epoch_seconds != 0
    }
}
