use tracing::{error, info};

use crate::{CommandResult, Context};

/// Shows or sets the language the bot uses in this guild
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    category = "Admin"
)]
pub async fn locale(
    ctx: Context<'_>,
    #[description = "Locale code, e.g. `en`"] code: Option<String>,
) -> CommandResult {
    let data = ctx.data();
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let Some(code) = code.map(|code| code.trim().to_lowercase()) else {
        ctx.say(format!(
            "Current locale is `{}`. Available: {}",
            data.locale_for(Some(guild_id)),
            data.localizer.locales().join(", ")
        ))
        .await?;
        return Ok(());
    };

    if !data.localizer.has_locale(&code) {
        ctx.say(format!(
            "Unknown locale `{}`. Available: {}",
            code,
            data.localizer.locales().join(", ")
        ))
        .await?;
        return Ok(());
    }

    data.settings.set_guild_locale(guild_id, &code)?;
    info!("Guild {} switched locale to '{}'", guild_id, code);
    ctx.say(format!("Locale set to `{}`.", code)).await?;
    Ok(())
}

/// Re-reads the locale files
#[poise::command(prefix_command, slash_command, owners_only, category = "Admin", hide_in_help)]
pub async fn reloadlocale(ctx: Context<'_>) -> CommandResult {
    match ctx.data().localizer.reload() {
        Ok(count) => {
            ctx.say(format!("Localizations reloaded. ({} locales)", count))
                .await?;
        }
        Err(e) => {
            error!("Failed to reload localizations: {}", e);
            ctx.say(format!("Failed to reload localizations: {}", e))
                .await?;
        }
    }
    Ok(())
}
