use super::*;

fn toggled(label: &str, enabled: bool) -> String {
    format!("{} {}", label, if enabled { "enabled" } else { "disabled" })
}

/// Shuffles the player's queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx
        .data()
        .music
        .with_player(guild_id, |player| {
            if !player.queue.is_playing() {
                return Err(MusicError::NothingPlaying);
            }
            Ok(player.queue.toggle_shuffle())
        })
        .await;

    if let Some(enabled) = or_report(ctx, result).await? {
        ctx.say(toggled("🔀 | Shuffle", enabled)).await?;
    }
    Ok(())
}

/// Repeats the queue until the command is invoked again
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("loop")
)]
pub async fn repeat(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx
        .data()
        .music
        .with_player(guild_id, |player| {
            if !player.queue.is_playing() {
                return Err(MusicError::NothingPlaying);
            }
            Ok(player.queue.toggle_repeat())
        })
        .await;

    if let Some(enabled) = or_report(ctx, result).await? {
        ctx.say(toggled("🔁 | Repeat", enabled)).await?;
    }
    Ok(())
}
