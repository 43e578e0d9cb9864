use crate::{CommandResult, Context};

/// Lists the guilds the bot is in
#[poise::command(prefix_command, slash_command, owners_only, category = "General", hide_in_help)]
pub async fn guilds(ctx: Context<'_>) -> CommandResult {
    let cache = ctx.cache();
    let mut listing = format!("{} is in:\n", cache.current_user().name);
    for guild_id in cache.guilds() {
        if let Some(guild) = cache.guild(guild_id) {
            listing.push_str(&guild.name);
            listing.push('\n');
        }
    }

    ctx.say(listing).await?;
    Ok(())
}
