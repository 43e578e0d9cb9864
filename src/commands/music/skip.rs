use super::*;

/// Skips the current track
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("forceskip", "fs")
)]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let result = ctx
        .data()
        .music
        .skip(ctx.serenity_context(), guild_id)
        .await;
    if or_report(ctx, result).await?.is_some() {
        ctx.send(embedded_messages::status("⏭ | Skipped.")).await?;
    }
    Ok(())
}
