//! Voice playback commands. All of them are guild-only and share one
//! [`MusicService`](utils::music_manager::MusicService) through the bot data.

pub(crate) mod find;
pub(crate) mod leave;
pub(crate) mod now;
pub(crate) mod pause;
pub(crate) mod play;
pub(crate) mod playat;
pub(crate) mod playnow;
pub(crate) mod previous;
pub(crate) mod queue;
pub(crate) mod remove;
pub(crate) mod seek;
pub(crate) mod shuffle;
pub(crate) mod skip;
pub(crate) mod stop;
pub(crate) mod volume;

pub(crate) mod audio_sources;
pub(crate) mod utils;

use poise::CreateReply;
use poise::serenity_prelude::GuildId;
use tracing::debug;

use crate::{CommandResult, Context, Error};
use audio_sources::{LoadResult, LoadType};
use utils::embedded_messages;
use utils::music_manager::{MusicError, MusicResult};

fn guild_id(ctx: Context<'_>) -> Result<GuildId, Error> {
    ctx.guild_id().ok_or_else(|| MusicError::NotInGuild.into())
}

/// Report a failed music operation in the channel. `None` tells the
/// command to stop there.
async fn or_report<T>(ctx: Context<'_>, result: MusicResult<T>) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            debug!("Music command '{}' failed: {}", ctx.command().name, err);
            ctx.send(embedded_messages::music_error(&err)).await?;
            Ok(None)
        }
    }
}

/// Join the author's channel (or check they are in ours).
async fn ensure_voice(ctx: Context<'_>, guild_id: GuildId) -> Result<bool, Error> {
    let result = ctx
        .data()
        .music
        .ensure_voice(
            ctx.serenity_context(),
            guild_id,
            ctx.author().id,
            ctx.channel_id(),
        )
        .await;
    Ok(or_report(ctx, result).await?.is_some())
}

/// Queue a load result the way `play` does: a whole playlist, or the best match.
async fn enqueue_loaded(ctx: Context<'_>, guild_id: GuildId, loaded: LoadResult) -> CommandResult {
    let user_id = ctx.author().id;
    let mut tracks: Vec<_> = loaded
        .tracks
        .into_iter()
        .map(|track| track.with_requester(user_id))
        .collect();

    let embed = match (loaded.load_type, tracks.first()) {
        (_, None) => {
            ctx.say("Nothing found!").await?;
            return Ok(());
        }
        (LoadType::Playlist, Some(_)) => embedded_messages::playlist_enqueued(
            loaded.playlist_name.as_deref().unwrap_or("Playlist"),
            tracks.len(),
        ),
        (_, Some(first)) => embedded_messages::track_enqueued(first),
    };
    if loaded.load_type != LoadType::Playlist {
        tracks.truncate(1);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    let result = ctx
        .data()
        .music
        .enqueue(ctx.serenity_context(), guild_id, tracks)
        .await;
    or_report(ctx, result).await?;
    Ok(())
}
