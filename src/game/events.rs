/// Lifecycle events raised by the host modding framework.
///
/// Each event carries no payload; anything the handler needs is read from the
/// snapshot source at the time the event is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LifecycleEvent {
    MenuSceneLoaded,
    MenuSceneActive,
    GameSceneActive,
    SongPaused,
    SongUnpaused,
}
