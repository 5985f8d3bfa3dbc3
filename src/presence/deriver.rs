//! Pure mapping from lifecycle transitions and gameplay snapshots to presence payloads

use crate::game::{Difficulty, GameplaySnapshot, Modifier};

use super::payload::PresencePayload;

pub const MAIN_MENU_DETAILS: &str = "Main Menu";
pub const MAIN_MENU_STATE: &str = "Selecting a song...";
pub const PAUSED_PREFIX: &str = "[PAUSED] ";
pub const PARTY_MODE_LABEL: &str = "Party!";
pub const MODIFIERS_ASSET_KEY: &str = "plus";

/// Lowest speed multiplier used for time calculations
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// Display labels for active modifiers, in presentation order
const MODIFIER_LABELS: &[(&[Modifier], &str)] = &[
    (&[Modifier::NoFail, Modifier::DemoNoFail], "No Fail"),
    (&[Modifier::NoBombs], "No Bombs"),
    (&[Modifier::DemoNoObstacles], "No Obstacles"),
    (&[Modifier::NoArrows], "No Arrows"),
    (&[Modifier::SlowerSong], "Slower Song"),
    (&[Modifier::InstaFail], "Insta Fail"),
    (&[Modifier::BatteryEnergy], "Battery Energy"),
    (&[Modifier::GhostNotes], "Ghost Notes"),
    (&[Modifier::DisappearingArrows], "Disappearing Arrows"),
    (&[Modifier::FasterSong], "Faster Song"),
];

pub fn on_main_menu() -> PresencePayload {
    PresencePayload {
        details: MAIN_MENU_DETAILS.to_string(),
        state: MAIN_MENU_STATE.to_string(),
        ..Default::default()
    }
}

pub fn on_song_start(snapshot: &GameplaySnapshot, now: i64) -> PresencePayload {
    let details = format!("{} - {}", snapshot.song_author, snapshot.song_name);

    let mut state = difficulty_label(snapshot.difficulty);
    if let Some(map_type) = map_type(snapshot) {
        state.push_str(" | ");
        state.push_str(map_type);
    }
    state.push_str(" | ");
    state.push_str(gamemode_label(snapshot));

    let modifiers = active_modifier_labels(snapshot);
    tracing::debug!("Active modifiers: {}", modifiers.join(", "));

    let (small_asset_key, small_asset_label) = if modifiers.is_empty() {
        (String::new(), String::new())
    } else {
        (
            MODIFIERS_ASSET_KEY.to_string(),
            format!("Modifiers: {}", modifiers.join(", ")),
        )
    };

    PresencePayload {
        details,
        state,
        small_asset_key,
        small_asset_label,
        end_timestamp_epoch_seconds: end_timestamp(snapshot, now),
    }
}

/// Returns the paused payload and the state string to restore on unpause
pub fn on_pause(current: &PresencePayload) -> (PresencePayload, String) {
    let saved_state = current.state.clone();
    let payload = PresencePayload {
        state: format!("{}{}", PAUSED_PREFIX, saved_state),
        end_timestamp_epoch_seconds: 0,
        ..current.clone()
    };
    (payload, saved_state)
}

pub fn on_unpause(
    current: &PresencePayload,
    saved_state: &str,
    snapshot: &GameplaySnapshot,
    now: i64,
) -> PresencePayload {
    PresencePayload {
        state: saved_state.to_string(),
        end_timestamp_epoch_seconds: end_timestamp(snapshot, now),
        ..current.clone()
    }
}

/// Difficulty text shown in the presence; only Expert+ differs from the variant name
pub fn difficulty_label(difficulty: Difficulty) -> String {
    match difficulty {
        Difficulty::ExpertPlus => "Expert+".to_string(),
        other => other.to_string(),
    }
}

pub fn map_type(snapshot: &GameplaySnapshot) -> Option<&'static str> {
    let characteristic = &snapshot.characteristic;
    if characteristic.number_of_colors == 1 {
        Some("One Saber")
    } else if characteristic.contains_rotation_events {
        if characteristic.requires_360_movement {
            Some("360")
        } else {
            Some("90")
        }
    } else {
        None
    }
}

fn gamemode_label(snapshot: &GameplaySnapshot) -> &str {
    if snapshot.is_party_mode_active {
        PARTY_MODE_LABEL
    } else {
        &snapshot.gameplay_mode
    }
}

pub fn active_modifier_labels(snapshot: &GameplaySnapshot) -> Vec<&'static str> {
    MODIFIER_LABELS
        .iter()
        .filter(|(modifiers, _)| modifiers.iter().any(|m| snapshot.has_modifier(*m)))
        .map(|(_, label)| *label)
        .collect()
}

/// Practice mode overrides the gameplay modifier speed. Non-finite values fall
/// back to normal speed and anything below [`MIN_SPEED_MULTIPLIER`] is clamped.
pub fn effective_speed_multiplier(snapshot: &GameplaySnapshot) -> f32 {
    let multiplier = snapshot
        .practice_speed_multiplier
        .unwrap_or(snapshot.song_speed_multiplier);

    if !multiplier.is_finite() {
        tracing::warn!("Ignoring non-finite song speed multiplier {}", multiplier);
        return 1.0;
    }
    if multiplier < MIN_SPEED_MULTIPLIER {
        tracing::warn!(
            "Clamping song speed multiplier {} to {}",
            multiplier,
            MIN_SPEED_MULTIPLIER
        );
        return MIN_SPEED_MULTIPLIER;
    }
    multiplier
}

/// Unix time at which the song ends. May lie in the past once the song is over.
pub fn end_timestamp(snapshot: &GameplaySnapshot, now: i64) -> i64 {
    let speed = effective_speed_multiplier(snapshot);
    let elapsed = snapshot.elapsed_song_seconds / speed;
    let remaining = snapshot.song_duration_seconds / speed - elapsed;
    // `as` truncates toward zero and saturates at the i64 bounds
    let end = now.saturating_add(remaining as i64);

    tracing::debug!(
        speed,
        elapsed,
        remaining,
        now,
        end,
        "Updating song end timestamp"
    );

    end
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::game::Characteristic;

    fn snapshot() -> GameplaySnapshot {
        GameplaySnapshot {
            song_author: "Camellia".to_string(),
            song_name: "Exit This Earth's Atomosphere".to_string(),
            song_duration_seconds: 180.0,
            elapsed_song_seconds: 0.0,
            difficulty: Difficulty::ExpertPlus,
            characteristic: Characteristic::default(),
            gameplay_mode: "Standard".to_string(),
            is_party_mode_active: false,
            modifiers: BTreeSet::new(),
            song_speed_multiplier: 1.0,
            practice_speed_multiplier: None,
            is_paused: false,
        }
    }

    #[test]
    fn main_menu_is_fixed() {
        let payload = on_main_menu();
        assert_eq!(payload.details, "Main Menu");
        assert_eq!(payload.state, "Selecting a song...");
        assert!(payload.small_asset_key.is_empty());
        assert!(payload.small_asset_label.is_empty());
        assert_eq!(payload.end_timestamp_epoch_seconds, 0);
        assert_eq!(payload, on_main_menu());
    }

    #[test]
    fn song_start_reference_scenario() {
        let payload = on_song_start(&snapshot(), 1000);
        assert_eq!(payload.details, "Camellia - Exit This Earth's Atomosphere");
        assert_eq!(payload.state, "Expert+ | Standard");
        assert_eq!(payload.end_timestamp_epoch_seconds, 1180);
        assert!(!payload.has_small_asset());
        assert!(payload.small_asset_label.is_empty());
    }

    #[test]
    fn song_start_with_modifiers_sets_small_asset() {
        let mut snap = snapshot();
        snap.modifiers = [Modifier::FasterSong, Modifier::NoFail].into_iter().collect();

        let payload = on_song_start(&snap, 1000);
        assert_eq!(payload.small_asset_key, "plus");
        assert_eq!(payload.small_asset_label, "Modifiers: No Fail, Faster Song");
    }

    #[test]
    fn song_start_is_idempotent() {
        let mut snap = snapshot();
        snap.elapsed_song_seconds = 42.7;
        snap.modifiers.insert(Modifier::GhostNotes);
        assert_eq!(on_song_start(&snap, 5000), on_song_start(&snap, 5000));
    }

    #[test]
    fn difficulty_labels_pass_through_except_expert_plus() {
        assert_eq!(difficulty_label(Difficulty::Easy), "Easy");
        assert_eq!(difficulty_label(Difficulty::Normal), "Normal");
        assert_eq!(difficulty_label(Difficulty::Hard), "Hard");
        assert_eq!(difficulty_label(Difficulty::Expert), "Expert");
        assert_eq!(difficulty_label(Difficulty::ExpertPlus), "Expert+");
    }

    #[test]
    fn one_saber_takes_precedence_over_rotation() {
        let mut snap = snapshot();
        snap.characteristic = Characteristic {
            number_of_colors: 1,
            contains_rotation_events: true,
            requires_360_movement: true,
        };
        assert_eq!(map_type(&snap), Some("One Saber"));
        assert_eq!(on_song_start(&snap, 0).state, "Expert+ | One Saber | Standard");
    }

    #[test]
    fn rotation_maps_are_360_or_90() {
        let mut snap = snapshot();
        snap.characteristic.contains_rotation_events = true;
        snap.characteristic.requires_360_movement = true;
        assert_eq!(map_type(&snap), Some("360"));

        snap.characteristic.requires_360_movement = false;
        assert_eq!(map_type(&snap), Some("90"));

        snap.characteristic.contains_rotation_events = false;
        snap.characteristic.requires_360_movement = true;
        assert_eq!(map_type(&snap), None);
    }

    #[test]
    fn party_mode_replaces_gameplay_mode() {
        let mut snap = snapshot();
        snap.is_party_mode_active = true;
        snap.difficulty = Difficulty::Hard;
        assert_eq!(on_song_start(&snap, 0).state, "Hard | Party!");
    }

    #[test]
    fn modifier_order_is_fixed() {
        let mut snap = snapshot();
        snap.modifiers = [Modifier::BatteryEnergy, Modifier::NoArrows].into_iter().collect();
        assert_eq!(
            active_modifier_labels(&snap).join(", "),
            "No Arrows, Battery Energy"
        );
    }

    #[test]
    fn no_fail_variants_share_one_label() {
        let mut snap = snapshot();
        snap.modifiers = [Modifier::NoFail, Modifier::DemoNoFail].into_iter().collect();
        assert_eq!(active_modifier_labels(&snap), vec!["No Fail"]);

        snap.modifiers = [Modifier::DemoNoFail].into_iter().collect();
        assert_eq!(active_modifier_labels(&snap), vec!["No Fail"]);
    }

    #[test]
    fn every_modifier_has_a_label() {
        let mut snap = snapshot();
        snap.modifiers = [
            Modifier::NoFail,
            Modifier::NoBombs,
            Modifier::DemoNoObstacles,
            Modifier::NoArrows,
            Modifier::SlowerSong,
            Modifier::InstaFail,
            Modifier::BatteryEnergy,
            Modifier::GhostNotes,
            Modifier::DisappearingArrows,
            Modifier::FasterSong,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            active_modifier_labels(&snap).join(", "),
            "No Fail, No Bombs, No Obstacles, No Arrows, Slower Song, Insta Fail, \
             Battery Energy, Ghost Notes, Disappearing Arrows, Faster Song"
        );
    }

    #[test]
    fn end_timestamp_accounts_for_speed_and_elapsed_time() {
        let mut snap = snapshot();
        snap.song_speed_multiplier = 1.5;
        snap.elapsed_song_seconds = 30.0;
        // 180 / 1.5 - 30 / 1.5 = 100
        assert_eq!(end_timestamp(&snap, 1000), 1100);
    }

    #[test]
    fn practice_speed_overrides_modifier_speed() {
        let mut snap = snapshot();
        snap.song_speed_multiplier = 1.2;
        snap.practice_speed_multiplier = Some(0.5);
        assert_eq!(effective_speed_multiplier(&snap), 0.5);
        assert_eq!(end_timestamp(&snap, 0), 360);
    }

    #[test]
    fn end_timestamp_truncates_toward_zero() {
        let mut snap = snapshot();
        snap.elapsed_song_seconds = 0.9;
        assert_eq!(end_timestamp(&snap, 1000), 1179);

        snap.song_duration_seconds = 10.0;
        snap.elapsed_song_seconds = 10.9;
        assert_eq!(end_timestamp(&snap, 1000), 1000);
    }

    #[test]
    fn end_timestamp_is_not_clamped_after_song_end() {
        let mut snap = snapshot();
        snap.elapsed_song_seconds = 200.0;
        assert_eq!(end_timestamp(&snap, 1000), 980);
    }

    #[test]
    fn degenerate_speed_multipliers_are_sanitized() {
        let mut snap = snapshot();
        snap.song_speed_multiplier = 0.0;
        assert_eq!(effective_speed_multiplier(&snap), MIN_SPEED_MULTIPLIER);

        snap.song_speed_multiplier = -2.0;
        assert_eq!(effective_speed_multiplier(&snap), MIN_SPEED_MULTIPLIER);

        snap.song_speed_multiplier = f32::NAN;
        assert_eq!(effective_speed_multiplier(&snap), 1.0);
        assert_eq!(end_timestamp(&snap, 1000), 1180);
    }

    #[test]
    fn pause_prefixes_state_and_hides_countdown() {
        let mut snap = snapshot();
        snap.modifiers.insert(Modifier::NoFail);
        let playing = on_song_start(&snap, 1000);

        let (paused, saved) = on_pause(&playing);
        assert_eq!(paused.state, "[PAUSED] Expert+ | Standard");
        assert_eq!(paused.end_timestamp_epoch_seconds, 0);
        assert_eq!(paused.details, playing.details);
        assert_eq!(paused.small_asset_label, playing.small_asset_label);
        assert_eq!(saved, "Expert+ | Standard");
    }

    #[test]
    fn unpause_restores_state_and_recomputes_countdown() {
        let mut snap = snapshot();
        snap.modifiers.insert(Modifier::GhostNotes);
        let playing = on_song_start(&snap, 1000);
        let (paused, saved) = on_pause(&playing);

        snap.elapsed_song_seconds = 60.0;
        let resumed = on_unpause(&paused, &saved, &snap, 1300);
        assert_eq!(resumed.state, playing.state);
        assert_eq!(resumed.end_timestamp_epoch_seconds, 1420);
        assert_eq!(resumed.small_asset_key, "plus");
        assert_eq!(resumed.small_asset_label, "Modifiers: Ghost Notes");
    }

    #[test]
    fn end_timestamp_saturates_for_huge_durations() {
        let mut snap = snapshot();
        snap.song_duration_seconds = f32::MAX;
        assert_eq!(end_timestamp(&snap, 1000), i64::MAX);

        snap.song_duration_seconds = f32::INFINITY;
        snap.song_speed_multiplier = 0.0;
        assert_eq!(end_timestamp(&snap, 1000), i64::MAX);
    }
}
