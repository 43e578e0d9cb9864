use super::*;

/// Shows the player's queue
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("q")
)]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page to show"] page: Option<u32>,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let view = ctx
        .data()
        .music
        .with_player(guild_id, |player| {
            embedded_messages::queue_page(player.queue.tracks(), page.unwrap_or(1) as usize)
        })
        .await;

    match view {
        Some(view) => {
            ctx.send(CreateReply::default().embed(embedded_messages::queue(view)))
                .await?;
        }
        None => {
            ctx.say("There's nothing in the queue! Why not queue something?")
                .await?;
        }
    }
    Ok(())
}
