use super::*;

/// Stops the player and clears its queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx.data().music.stop(guild_id).await;
    if or_report(ctx, result).await?.is_some() {
        ctx.send(embedded_messages::status("⏹ | Stopped.")).await?;
    }
    Ok(())
}
