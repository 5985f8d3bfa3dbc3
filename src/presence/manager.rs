//! Routes lifecycle events through the session and fans payloads out to providers

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};

use crate::game::LifecycleEvent;

use super::payload::PresencePayload;
use super::session::{PresenceSession, SessionPhase};
use super::traits::{PresenceProvider, SnapshotSource};

/// Source of the current Unix time in seconds
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

fn system_clock() -> Clock {
    Box::new(|| chrono::Utc::now().timestamp())
}

/// Manages the presence session and multiple presence providers
pub struct PresenceManager {
    providers: Vec<Box<dyn PresenceProvider>>,
    session: Mutex<PresenceSession>,
    source: Arc<dyn SnapshotSource>,
    clock: Clock,
}

impl PresenceManager {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self::with_clock(source, system_clock())
    }

    pub fn with_clock(source: Arc<dyn SnapshotSource>, clock: Clock) -> Self {
        Self {
            providers: Vec::new(),
            session: Mutex::new(PresenceSession::new()),
            source,
            clock,
        }
    }

    /// Add a presence provider
    pub fn add_provider(&mut self, provider: Box<dyn PresenceProvider>) {
        tracing::info!("Adding presence provider: {}", provider.name());
        self.providers.push(provider);
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.lock().unwrap().phase()
    }

    /// The payload most recently published
    pub fn current_payload(&self) -> PresencePayload {
        self.session.lock().unwrap().current().clone()
    }

    /// Apply one lifecycle event. Returns the payload that was published, if any.
    pub fn handle_event(&self, event: LifecycleEvent) -> Option<PresencePayload> {
        tracing::debug!("Handling lifecycle event: {}", event);

        let payload = match event {
            LifecycleEvent::MenuSceneLoaded => {
                tracing::debug!("Main menu loaded");
                return None;
            }
            LifecycleEvent::MenuSceneActive => {
                tracing::info!("Main menu active");
                Some(self.session.lock().unwrap().main_menu())
            }
            LifecycleEvent::GameSceneActive => self.start_song(),
            LifecycleEvent::SongPaused => {
                tracing::info!("Song paused");
                let result = self.session.lock().unwrap().pause();
                result
                    .map_err(|e| tracing::warn!("Ignoring pause: {}", e))
                    .ok()
            }
            LifecycleEvent::SongUnpaused => self.resume_song(),
        };

        if let Some(ref payload) = payload {
            self.update_all_presence(payload);
        }
        payload
    }

    fn start_song(&self) -> Option<PresencePayload> {
        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Failed to read song state: {}", e);
                return None;
            }
        };

        tracing::info!(
            "Song started: {} - {}",
            snapshot.song_author,
            snapshot.song_name
        );
        let now = (self.clock)();
        Some(self.session.lock().unwrap().song_start(&snapshot, now))
    }

    fn resume_song(&self) -> Option<PresencePayload> {
        tracing::info!("Song resumed");

        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Failed to read song state: {}", e);
                return None;
            }
        };

        let now = (self.clock)();
        let result = self.session.lock().unwrap().unpause(&snapshot, now);
        result
            .map_err(|e| tracing::warn!("Ignoring unpause: {}", e))
            .ok()
    }

    /// Update presence on all providers
    pub fn update_all_presence(&self, payload: &PresencePayload) {
        tracing::debug!("Updating presence: {:?}", payload);
        for provider in &self.providers {
            provider.update_presence(payload);
        }
    }

    /// Clear presence on all providers
    pub fn clear_all_presence(&self) {
        for provider in &self.providers {
            provider.clear_presence();
        }
    }
}

/// Host-side handle for queueing lifecycle events
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<LifecycleEvent>,
}

impl EventSender {
    /// Queue an event. Returns false once the background task has stopped.
    pub fn send(&self, event: LifecycleEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Running event queue task
pub struct BackgroundTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    /// Apply events already queued, clear presence and wait for the task to exit.
    ///
    /// Senders still held elsewhere are refused from this point on.
    pub async fn stop(self) -> Result<(), JoinError> {
        let _ = self.shutdown.send(());
        self.handle.await
    }
}

/// Start the background task that applies queued lifecycle events in order.
///
/// The task exits and clears presence once [`BackgroundTask::stop`] is called
/// or every [`EventSender`] is dropped.
pub fn start_presence_background_task(
    presence_manager: Arc<PresenceManager>,
) -> (EventSender, BackgroundTask) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Some(event) => {
                        presence_manager.handle_event(event);
                    }
                    None => break,
                },
                _ = &mut shutdown_rx => {
                    rx.close();
                    while let Ok(event) = rx.try_recv() {
                        presence_manager.handle_event(event);
                    }
                    break;
                }
            }
        }

        tracing::debug!("Event queue closed, clearing presence");
        presence_manager.clear_all_presence();
    });

    (
        EventSender { tx },
        BackgroundTask {
            shutdown: shutdown_tx,
            handle,
        },
    )
}
