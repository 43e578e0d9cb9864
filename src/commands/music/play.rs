use super::*;
use tracing::info;

/// Searches and plays a song from a given query
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("p")
)]
pub async fn play(
    ctx: Context<'_>,
    #[rest]
    #[description = "URL or search query"]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = guild_id(ctx)?;
    if !ensure_voice(ctx, guild_id).await? {
        return Ok(());
    }

    // Loading can take a while for playlists
    ctx.defer().await?;

    let Some(loaded) = or_report(ctx, ctx.data().music.loader().load(&query).await).await? else {
        return Ok(());
    };
    enqueue_loaded(ctx, guild_id, loaded).await
}
