//! Defines `TrackMetadata`, the bot's representation of a playable track,
//! and its conversion from `yt-dlp` JSON output.

use poise::serenity_prelude::UserId;
use serde::Deserialize;
use std::time::Duration;

use super::youtube::YoutubeApi;

/// Information about a playable track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    /// Page URL handed to `yt-dlp` when the track is played.
    pub url: String,
    /// Source-specific id (the YouTube video id for YouTube tracks).
    pub identifier: Option<String>,
    pub duration: Option<Duration>,
    /// Live streams have no meaningful duration.
    pub is_stream: bool,
    pub thumbnail: Option<String>,
    pub requested_by: Option<UserId>,
}

impl TrackMetadata {
    pub fn with_requester(mut self, user_id: UserId) -> Self {
        self.requested_by = Some(user_id);
        self
    }

    /// Markdown link to the track.
    pub fn link(&self) -> String {
        format!("[{}]({})", self.title, self.url)
    }

    /// Thumbnail to show in embeds: the one reported by the source, or the
    /// standard YouTube still for YouTube tracks.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail.clone().or_else(|| {
            let id = self
                .identifier
                .clone()
                .or_else(|| YoutubeApi::video_id(&self.url))?;
            YoutubeApi::is_youtube_url(&self.url).then(|| YoutubeApi::thumbnail_url(&id))
        })
    }
}

/// One JSON line of `yt-dlp -j --flat-playlist` output.
#[derive(Debug, Deserialize)]
pub(crate) struct YtDlpEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub duration: Option<f64>,
    pub is_live: Option<bool>,
    pub live_status: Option<String>,
    pub thumbnail: Option<String>,
    pub playlist_title: Option<String>,
}

impl YtDlpEntry {
    /// Convert to metadata. Entries without any usable URL are dropped.
    pub fn into_metadata(self) -> Option<TrackMetadata> {
        let url = self
            .webpage_url
            .or(self.url)
            .filter(|url| url.starts_with("http"))
            .or_else(|| {
                self.id
                    .as_deref()
                    .map(|id| format!("https://www.youtube.com/watch?v={}", id))
            })?;

        let is_stream =
            self.is_live.unwrap_or(false) || self.live_status.as_deref() == Some("is_live");

        Some(TrackMetadata {
            title: self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            url,
            identifier: self.id,
            duration: self
                .duration
                .filter(|secs| *secs > 0.0)
                .map(Duration::from_secs_f64),
            is_stream,
            thumbnail: self.thumbnail,
            requested_by: None,
        })
    }
}
