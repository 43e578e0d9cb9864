use super::*;

/// Plays a song immediately, interrupting the current one
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("pn")
)]
pub async fn playnow(
    ctx: Context<'_>,
    #[rest]
    #[description = "URL or search query"]
    query: String,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    if !ensure_voice(ctx, guild_id).await? {
        return Ok(());
    }
    ctx.defer().await?;

    let music = &ctx.data().music;
    let Some(loaded) = or_report(ctx, music.loader().load(&query).await).await? else {
        return Ok(());
    };

    let idle = music
        .with_player(guild_id, |player| player.queue.is_idle())
        .await;
    if idle {
        return enqueue_loaded(ctx, guild_id, loaded).await;
    }

    let user_id = ctx.author().id;
    let mut tracks = loaded
        .tracks
        .into_iter()
        .map(|track| track.with_requester(user_id));
    let Some(first) = tracks.next() else {
        ctx.say("Nothing found!").await?;
        return Ok(());
    };
    let rest = if loaded.load_type == LoadType::Playlist {
        tracks.collect()
    } else {
        Vec::new()
    };

    let result = music
        .play_now(ctx.serenity_context(), guild_id, first, rest)
        .await;
    or_report(ctx, result).await?;
    Ok(())
}
