mod presence;

pub use presence::{DiscordPresence, DiscordState, BEAT_SABER_STEAM_APP_ID, DISCORD_APP_ID};
