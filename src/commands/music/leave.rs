use super::*;

/// Disconnects the player from the voice channel and clears its queue
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("dc")
)]
pub async fn disconnect(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx
        .data()
        .music
        .disconnect(ctx.serenity_context(), guild_id, ctx.author().id)
        .await;
    if or_report(ctx, result).await?.is_some() {
        ctx.send(embedded_messages::status("*⃣ | Disconnected.")).await?;
    }
    Ok(())
}
