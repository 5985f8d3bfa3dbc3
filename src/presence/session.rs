//! Session context carried between lifecycle events

use crate::game::GameplaySnapshot;

use super::deriver;
use super::payload::PresencePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionPhase {
    MainMenu,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{event} is not valid while {phase}")]
    UnexpectedEvent {
        event: &'static str,
        phase: SessionPhase,
    },
}

/// Tracks the session phase, the last published payload and the state string
/// saved for the current pause episode.
#[derive(Debug, Clone)]
pub struct PresenceSession {
    phase: SessionPhase,
    current: PresencePayload,
    saved_state: Option<String>,
}

impl PresenceSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::MainMenu,
            current: deriver::on_main_menu(),
            saved_state: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current(&self) -> &PresencePayload {
        &self.current
    }

    pub fn saved_state(&self) -> Option<&str> {
        self.saved_state.as_deref()
    }

    /// Accepted from any phase
    pub fn main_menu(&mut self) -> PresencePayload {
        self.transition(SessionPhase::MainMenu, deriver::on_main_menu())
    }

    /// Accepted from any phase, a restart from the pause menu starts a new song
    pub fn song_start(&mut self, snapshot: &GameplaySnapshot, now: i64) -> PresencePayload {
        self.transition(SessionPhase::Playing, deriver::on_song_start(snapshot, now))
    }

    pub fn pause(&mut self) -> Result<PresencePayload, SessionError> {
        self.expect_phase("pause", SessionPhase::Playing)?;

        let (payload, saved_state) = deriver::on_pause(&self.current);
        self.phase = SessionPhase::Paused;
        self.current = payload.clone();
        self.saved_state = Some(saved_state);
        Ok(payload)
    }

    pub fn unpause(
        &mut self,
        snapshot: &GameplaySnapshot,
        now: i64,
    ) -> Result<PresencePayload, SessionError> {
        self.expect_phase("unpause", SessionPhase::Paused)?;

        let saved_state = self.saved_state.take().unwrap_or_default();
        let payload = deriver::on_unpause(&self.current, &saved_state, snapshot, now);
        self.phase = SessionPhase::Playing;
        self.current = payload.clone();
        Ok(payload)
    }

    fn expect_phase(&self, event: &'static str, expected: SessionPhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::UnexpectedEvent {
                event,
                phase: self.phase,
            })
        }
    }

    fn transition(&mut self, phase: SessionPhase, payload: PresencePayload) -> PresencePayload {
        self.phase = phase;
        self.current = payload.clone();
        self.saved_state = None;
        payload
    }
}

impl Default for PresenceSession {
    fn default() -> Self {
        Self::new()
    }
}
