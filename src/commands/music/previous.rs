use super::*;

/// Plays the previous song
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("pv")
)]
pub async fn previous(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    if !ensure_voice(ctx, guild_id).await? {
        return Ok(());
    }

    let result = ctx
        .data()
        .music
        .play_previous(ctx.serenity_context(), guild_id)
        .await;
    or_report(ctx, result).await?;
    Ok(())
}
