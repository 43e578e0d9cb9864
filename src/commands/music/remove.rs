use super::*;

/// Removes an item from the player's queue with the given index
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position of the track in the queue"] index: i64,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let reply = ctx
        .data()
        .music
        .with_player(guild_id, |player| {
            let len = player.queue.len();
            if len == 0 {
                return "Nothing queued.".to_string();
            }
            if index < 1 || index as usize > len {
                return format!("Index has to be **between** 1 and {}", len);
            }
            match player.queue.remove(index as usize - 1) {
                Some(removed) => format!("Removed **{}** from the queue.", removed.title),
                None => "Nothing queued.".to_string(),
            }
        })
        .await;

    ctx.say(reply).await?;
    Ok(())
}
