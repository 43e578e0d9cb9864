use super::*;

/// Checks a 1-based queue position given by a user.
pub(crate) fn validate_play_at(index: i64, queue_len: usize) -> Result<usize, &'static str> {
    if index < 1 {
        return Err("Invalid specified index.");
    }
    let index = index as usize;
    if index > queue_len {
        return Err("This index exceeds the queue's length.");
    }
    Ok(index - 1)
}

/// Plays the queue from a specific point. Disregards tracks before the index.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("pa")
)]
pub async fn playat(
    ctx: Context<'_>,
    #[description = "Queue position to jump to"] index: i64,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let queue_len = music.with_player(guild_id, |player| player.queue.len()).await;
    let index = match validate_play_at(index, queue_len) {
        Ok(index) => index,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let result = music.play_at(ctx.serenity_context(), guild_id, index).await;
    or_report(ctx, result).await?;
    Ok(())
}
