use super::*;

/// Shows some stats about the currently playing song
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("np", "n", "playing")
)]
pub async fn now(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let current = music
        .with_player(guild_id, |player| player.queue.current().cloned())
        .await;
    let position = music.position(guild_id).await.unwrap_or_default();

    let embed = embedded_messages::now_playing(current.as_ref().map(|track| (track, position)));
    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
