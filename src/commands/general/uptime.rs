use super::format_uptime;
use crate::{CommandResult, Context};

/// How long the bot has been running
#[poise::command(slash_command, prefix_command, category = "General", hide_in_help)]
pub async fn uptime(ctx: Context<'_>) -> CommandResult {
    ctx.say(format_uptime(ctx.data().uptime())).await?;
    Ok(())
}
