//! Read-only view of the gameplay facts the host exposes when a song is active

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Beatmap difficulty as reported by the game
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
}

/// Layout metadata of the selected beatmap characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub number_of_colors: u32,
    pub contains_rotation_events: bool,
    pub requires_360_movement: bool,
}

impl Default for Characteristic {
    fn default() -> Self {
        Self {
            number_of_colors: 2,
            contains_rotation_events: false,
            requires_360_movement: false,
        }
    }
}

/// Gameplay modifier toggles
///
/// Song speed and energy type are enums in the game; only the values that are
/// shown in the presence are modeled here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Modifier {
    NoFail,
    DemoNoFail,
    NoBombs,
    DemoNoObstacles,
    NoArrows,
    SlowerSong,
    InstaFail,
    BatteryEnergy,
    GhostNotes,
    DisappearingArrows,
    FasterSong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplaySnapshot {
    pub song_author: String,
    pub song_name: String,
    pub song_duration_seconds: f32,
    /// Raw audio time, not yet divided by the speed multiplier
    pub elapsed_song_seconds: f32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub characteristic: Characteristic,
    pub gameplay_mode: String,
    #[serde(default)]
    pub is_party_mode_active: bool,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    pub song_speed_multiplier: f32,
    /// Set only while in practice mode; takes precedence over `song_speed_multiplier`
    #[serde(default)]
    pub practice_speed_multiplier: Option<f32>,
    #[serde(default)]
    pub is_paused: bool,
}

impl GameplaySnapshot {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}
