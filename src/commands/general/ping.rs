use poise::{CreateReply, serenity_prelude as serenity};
use std::time::{Duration, Instant};

use crate::{CommandResult, Context};

/// Ping the bot to check its latency
#[poise::command(
    slash_command,
    prefix_command,
    category = "General",
    required_permissions = "MANAGE_MESSAGES",
    hide_in_help
)]
pub async fn ping(ctx: Context<'_>) -> CommandResult {
    let start = Instant::now();
    let reply = ctx.say("Ping...").await?;
    let round_trip = start.elapsed().as_millis();

    let latency = get_shard_latency(&ctx)
        .await
        .unwrap_or_default()
        .as_millis();

    reply
        .edit(
            ctx,
            CreateReply::default().content(format!(
                "Pong!\nPing: {}ms | websocket: {}ms",
                round_trip, latency
            )),
        )
        .await?;

    Ok(())
}

async fn get_shard_latency(ctx: &Context<'_>) -> Option<Duration> {
    // Each shard runner tracks the heartbeat latency of its gateway connection.
    let shard_manager = ctx.framework().shard_manager();
    let runners = shard_manager.runners.lock().await;
    let runner = runners.get(&serenity::ShardId(ctx.serenity_context().shard_id.0))?;

    runner.latency
}
