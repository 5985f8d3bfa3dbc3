pub mod deriver;
mod manager;
mod payload;
mod session;
mod traits;

pub use manager::{
    start_presence_background_task, BackgroundTask, Clock, EventSender, PresenceManager,
};
pub use payload::PresencePayload;
pub use session::{PresenceSession, SessionError, SessionPhase};
pub use traits::{HostError, PresenceProvider, SnapshotSource};
