//! This module aggregates all the command modules for the bot.

/// Guild administration (e.g., locale).
pub(crate) mod admins;
/// General purpose commands (e.g., ping, info).
pub(crate) mod general;
/// Commands related to music playback and the search selector.
pub(crate) mod music;
