use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;
use std::time::Duration;

use super::{format_time, music_manager::MusicError};
use crate::commands::music::audio_sources::TrackMetadata;
use crate::utils::paginator::BLURPLE;

pub const TRACKS_PER_QUEUE_PAGE: usize = 10;

/// Create an embed for a failed music command
pub fn music_error(err: &MusicError) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("❌ Error")
            .description(err.to_string())
            .color(0xff0000),
    )
}

/// A one-line status reply such as "⏭ | Skipped."
pub fn status(text: impl Into<String>) -> CreateReply {
    CreateReply::default().content(text)
}

fn with_thumbnail(embed: CreateEmbed, track: &TrackMetadata) -> CreateEmbed {
    match track.thumbnail_url() {
        Some(url) => embed.thumbnail(url),
        None => embed,
    }
}

pub fn track_enqueued(track: &TrackMetadata) -> CreateEmbed {
    with_thumbnail(
        CreateEmbed::new()
            .title("Track Enqueued")
            .description(track.link())
            .color(BLURPLE),
        track,
    )
}

pub fn playlist_enqueued(name: &str, count: usize) -> CreateEmbed {
    CreateEmbed::new()
        .title("Playlist Enqueued!")
        .description(format!("{} - {} tracks", name, count))
        .color(BLURPLE)
}

/// Posted to the player's channel whenever a new track starts
pub fn now_playing_announcement(track: &TrackMetadata) -> CreateEmbed {
    with_thumbnail(
        CreateEmbed::new()
            .title("Now playing:")
            .description(track.title.clone())
            .color(BLURPLE),
        track,
    )
}

/// Body of the `now` command: link plus `(position/duration)`.
pub fn now_playing_description(current: Option<(&TrackMetadata, Duration)>) -> String {
    let Some((track, position)) = current else {
        return "Nothing".to_string();
    };
    let duration = if track.is_stream {
        "🔴 LIVE".to_string()
    } else {
        track
            .duration
            .map(format_time)
            .unwrap_or_else(|| "Unknown".to_string())
    };
    format!(
        "**{}**\n({}/{})",
        track.link(),
        format_time(position),
        duration
    )
}

pub fn now_playing(current: Option<(&TrackMetadata, Duration)>) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("Now Playing")
        .description(now_playing_description(current))
        .color(BLURPLE);
    match current {
        Some((track, _)) => with_thumbnail(embed, track),
        None => embed,
    }
}

/// One page of the queue listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueView {
    pub description: String,
    pub footer: String,
}

/// Lay out the 1-based `page` of `tracks`, clamped to the pages that exist.
/// `None` when the queue is empty.
pub fn queue_page(tracks: &[TrackMetadata], page: usize) -> Option<QueueView> {
    if tracks.is_empty() {
        return None;
    }
    let pages = tracks.len().div_ceil(TRACKS_PER_QUEUE_PAGE);
    let page = page.clamp(1, pages);
    let start = (page - 1) * TRACKS_PER_QUEUE_PAGE;

    let listing: String = tracks
        .iter()
        .enumerate()
        .skip(start)
        .take(TRACKS_PER_QUEUE_PAGE)
        .map(|(index, track)| format!("`{}.` [**{}**]({})\n", index + 1, track.title, track.url))
        .collect();

    Some(QueueView {
        description: format!("**{} tracks**\n\n{}", tracks.len(), listing),
        footer: format!("Viewing page {}/{}", page, pages),
    })
}

pub fn queue(view: QueueView) -> CreateEmbed {
    CreateEmbed::new()
        .description(view.description)
        .footer(serenity::CreateEmbedFooter::new(view.footer))
        .color(BLURPLE)
}

/// Replaces the search listing once a result was queued
pub fn song_sent_to_queue(track: &TrackMetadata) -> CreateEmbed {
    with_thumbnail(
        CreateEmbed::new()
            .title("Song sent to queue")
            .description(track.link())
            .color(BLURPLE),
        track,
    )
}

/// Replaces the search listing when no result was picked
pub fn search_ended(reason: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Sorry")
        .description(reason)
        .color(BLURPLE)
}
