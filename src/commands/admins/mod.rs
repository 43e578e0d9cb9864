//! Commands that change how the bot behaves in a guild.

pub(crate) mod locale;
