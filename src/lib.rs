//! roxbot: a Discord music bot with reaction-driven search menus.

use chrono::{DateTime, Utc};
use poise::serenity_prelude::GuildId;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

mod commands;
pub mod config;
pub mod utils;

pub use commands::music::audio_sources::{LoadResult, LoadType, TrackLoader, TrackMetadata};
pub use commands::music::utils::music_manager::{MusicError, MusicResult, MusicService};
pub use commands::music::utils::player_queue::PlayerQueue;

use config::Config;
use utils::database::SettingsStore;
use utils::localizer::Localizer;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub config: Config,
    pub localizer: Arc<Localizer>,
    pub settings: Arc<SettingsStore>,
    pub music: Arc<MusicService>,
    pub started_at: DateTime<Utc>,
}

impl Data {
    /// The guild's configured locale, or the default one.
    pub fn locale_for(&self, guild_id: Option<GuildId>) -> String {
        let configured = guild_id.and_then(|guild_id| {
            self.settings
                .guild_locale(guild_id)
                .inspect_err(|e| warn!("Failed to read locale for guild {}: {}", guild_id, e))
                .ok()
                .flatten()
        });

        configured
            .filter(|locale| self.localizer.has_locale(locale))
            .unwrap_or_else(|| self.localizer.default_locale().to_string())
    }

    pub fn uptime(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }
}

#[poise::command(slash_command, prefix_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    use commands::admins::locale::*;
    use commands::general::{guilds::*, info::*, ping::*, uptime::*};
    use commands::music::{
        find::*, leave::*, now::*, pause::*, play::*, playat::*, playnow::*, previous::*,
        queue::*, remove::*, seek::*, shuffle::*, skip::*, stop::*, volume::*,
    };

    vec![
        // Default commands
        register(),
        help(),
        // General commands
        ping(),
        uptime(),
        info(),
        guilds(),
        // Admin commands
        locale(),
        reloadlocale(),
        // Music commands
        play(),
        previous(),
        playnow(),
        playat(),
        seek(),
        skip(),
        stop(),
        now(),
        queue(),
        pause(),
        volume(),
        shuffle(),
        repeat(),
        remove(),
        find(),
        disconnect(),
    ]
}
