use super::*;

/// Shows or changes the player's volume (0 to 1000)
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    aliases("vol")
)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "New volume in percent"] volume: Option<i64>,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    match volume.filter(|volume| *volume != 0) {
        None => {
            let current = music
                .with_player(guild_id, |player| player.queue.volume())
                .await;
            ctx.say(format!("🔈 | {}%", current)).await?;
        }
        Some(volume) => {
            if let Some(applied) = or_report(ctx, music.set_volume(guild_id, volume).await).await?
            {
                ctx.say(format!("🔈 | Set to {}%", applied)).await?;
            }
        }
    }
    Ok(())
}
