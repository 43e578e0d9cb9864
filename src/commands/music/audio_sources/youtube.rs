//! YouTube URL helpers.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Regex to match and capture YouTube video URLs (various formats).
static YOUTUBE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:https?:)?//)?((?:www|m|music)\.)?((?:youtube\.com|youtu\.be))(/(?:[\w\-]+\?v=|embed/|v/|shorts/)?)([\w\-]+)(\S+)?$").unwrap()
});

pub struct YoutubeApi;

impl YoutubeApi {
    /// Checks if the input string is a YouTube URL.
    pub fn is_youtube_url(query: &str) -> bool {
        match Url::parse(query) {
            Ok(url) => url.host_str().is_some_and(|host| {
                matches!(
                    host,
                    "www.youtube.com"
                        | "youtube.com"
                        | "m.youtube.com"
                        | "music.youtube.com"
                        | "youtu.be"
                )
            }),
            Err(_) => false,
        }
    }

    /// Extracts the video id from the usual YouTube URL shapes.
    pub fn video_id(url: &str) -> Option<String> {
        YOUTUBE_REGEX
            .captures(url)
            .and_then(|captures| captures.get(5))
            .map(|id| id.as_str().to_string())
    }

    pub fn thumbnail_url(video_id: &str) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
    }
}
