use poise::CreateReply;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, UserId};
use std::collections::HashSet;

use super::format_uptime;
use crate::utils::localizer::Localizer;
use crate::{CommandResult, Context};

const INFO_COLOR: u32 = 0xD9C04D;

/// Counters shown in the info embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotStats {
    pub guilds: usize,
    pub members: usize,
}

/// The localized text of the info embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoText {
    pub fields: Vec<(String, String, bool)>,
    pub footer: String,
}

fn fill(template: String, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(template, |text, (key, value)| text.replace(key, value))
}

pub fn info_text(localizer: &Localizer, locale: &str, stats: BotStats, uptime: &str) -> InfoText {
    let text = |key: &str| {
        localizer
            .get(locale, key)
            .unwrap_or_else(|| format!("{{{}}}", key))
    };

    let spec = fill(
        text("info.spectext"),
        &[
            ("{_bot_v}", env!("CARGO_PKG_VERSION").to_string()),
            ("{_os}", std::env::consts::OS.to_string()),
            ("{_arch}", std::env::consts::ARCH.to_string()),
        ],
    );
    let stats = fill(
        text("info.stattext"),
        &[
            ("{_guilds}", stats.guilds.to_string()),
            ("{_members}", stats.members.to_string()),
        ],
    );

    InfoText {
        fields: vec![
            (text("info.what"), text("info.infotext"), false),
            (text("info.how"), spec, true),
            (text("info.how_many"), stats, true),
            (text("info.how_long"), uptime.to_string(), true),
        ],
        footer: text("info.footer_text"),
    }
}

/// Info about the bot
#[poise::command(slash_command, prefix_command, category = "General")]
pub async fn info(ctx: Context<'_>) -> CommandResult {
    let (name, avatar, stats) = {
        let cache = ctx.cache();
        let mut members: HashSet<UserId> = HashSet::new();
        let guild_ids = cache.guilds();
        for guild_id in &guild_ids {
            if let Some(guild) = cache.guild(*guild_id) {
                members.extend(guild.members.keys().copied());
            }
        }
        let user = cache.current_user();
        (
            user.name.clone(),
            user.face(),
            BotStats {
                guilds: guild_ids.len(),
                members: members.len(),
            },
        )
    };

    let data = ctx.data();
    let locale = data.locale_for(ctx.guild_id());
    let text = info_text(&data.localizer, &locale, stats, &format_uptime(data.uptime()));

    let embed = CreateEmbed::new()
        .color(INFO_COLOR)
        .author(CreateEmbedAuthor::new(name).icon_url(avatar.clone()))
        .thumbnail(avatar)
        .fields(text.fields)
        .footer(CreateEmbedFooter::new(text.footer));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
