use super::*;

/// Pauses or resumes the current track
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("resume")
)]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx.data().music.toggle_pause(guild_id).await;
    if let Some(paused) = or_report(ctx, result).await? {
        let text = if paused { "⏯ | Paused" } else { "⏯ | Resumed" };
        ctx.send(embedded_messages::status(text)).await?;
    }
    Ok(())
}
