use super::*;
use poise::serenity_prelude::{CreateMessage, EditMessage, Mentionable};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::utils::selector::surface::SerenitySurface;
use crate::utils::selector::{
    Action, Selector, SelectorContext, SelectorOptions, SelectorOutcome, Termination,
};
use super::audio_sources::TrackMetadata;

pub const FIND_LIMIT: usize = 10;
const RESULTS_PER_PAGE: usize = 5;
const CLEANUP_DELAY: Duration = Duration::from_secs(10);
const NO_TRACK_PICKED: &str = "There is no track behind that number";

/// How a search listing ended, as shown in place of the listing.
#[derive(Debug, PartialEq)]
pub(crate) enum FindResult {
    Queued(TrackMetadata),
    Failed(String),
    Cancelled,
    Expired,
}

impl FindResult {
    pub(crate) fn from_outcome(outcome: SelectorOutcome<MusicResult<TrackMetadata>>) -> Self {
        match (outcome.ended, outcome.result) {
            (_, Some(Ok(track))) => FindResult::Queued(track),
            (_, Some(Err(err))) => FindResult::Failed(err.to_string()),
            (Termination::Selected, None) => FindResult::Failed(NO_TRACK_PICKED.to_string()),
            (Termination::Cancelled, None) => FindResult::Cancelled,
            (_, None) => FindResult::Expired,
        }
    }

    fn embed(&self) -> poise::serenity_prelude::CreateEmbed {
        match self {
            FindResult::Queued(track) => embedded_messages::song_sent_to_queue(track),
            FindResult::Failed(reason) => embedded_messages::search_ended(reason),
            FindResult::Cancelled => embedded_messages::search_ended("Search cancelled by user"),
            FindResult::Expired => embedded_messages::search_ended("Timer expired"),
        }
    }
}

/// Lists the first 10 search results from a given query
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn find(
    ctx: Context<'_>,
    #[rest]
    #[description = "What to search for"]
    query: String,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    ctx.defer_or_broadcast().await?;

    let data = ctx.data();
    let Some(found) = or_report(ctx, data.music.loader().search(&query, FIND_LIMIT).await).await?
    else {
        return Ok(());
    };
    let tracks: Vec<TrackMetadata> = found.tracks.into_iter().take(FIND_LIMIT).collect();
    if tracks.is_empty() {
        ctx.say("Nothing found").await?;
        return Ok(());
    }

    let serenity_ctx = ctx.serenity_context().clone();
    let surface = Arc::new(SerenitySurface::new(serenity_ctx.clone(), ctx.channel_id()));
    let author = ctx.author().id;
    let channel_id = ctx.channel_id();

    let labels = tracks.iter().map(TrackMetadata::link).collect();
    let actions = tracks
        .iter()
        .map(|_| {
            let music = Arc::clone(&data.music);
            let serenity_ctx = serenity_ctx.clone();
            Action::from_async(move |track: TrackMetadata| {
                let music = Arc::clone(&music);
                let serenity_ctx = serenity_ctx.clone();
                async move {
                    music
                        .send_to_play(&serenity_ctx, guild_id, author, channel_id, track.clone())
                        .await
                        .map(|()| track)
                }
            })
        })
        .collect();

    let selector = Selector::new(
        SelectorContext {
            author,
            surface: Arc::clone(&surface),
            localizer: Arc::clone(&data.localizer),
            locale: data.locale_for(Some(guild_id)),
        },
        labels,
        actions,
        tracks,
        SelectorOptions {
            num_selections: RESULTS_PER_PAGE,
            ..Default::default()
        },
    )?;

    let Some(outcome) = selector.start().await? else {
        return Ok(());
    };
    let message_id = outcome.message;
    let result = FindResult::from_outcome(outcome);

    channel_id
        .edit_message(ctx.http(), message_id, EditMessage::new().embed(result.embed()))
        .await?;

    if matches!(result, FindResult::Cancelled | FindResult::Expired) {
        // Ping the author, then tidy up the listing and the ping.
        let ping = channel_id
            .send_message(ctx.http(), CreateMessage::new().content(author.mention().to_string()))
            .await?;
        tokio::time::sleep(CLEANUP_DELAY).await;
        for message in [message_id, ping.id] {
            if let Err(e) = channel_id.delete_message(ctx.http(), message).await {
                warn!("Failed to delete search message {}: {}", message, e);
            }
        }
    }
    Ok(())
}
