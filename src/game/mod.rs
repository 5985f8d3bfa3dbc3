mod events;
mod snapshot;

pub use events::LifecycleEvent;
pub use snapshot::{Characteristic, Difficulty, GameplaySnapshot, Modifier};
