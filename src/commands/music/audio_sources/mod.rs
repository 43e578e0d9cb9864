//! Resolves user queries into playable tracks using the `yt-dlp` command-line tool.

/// Submodule defining the `TrackMetadata` struct used across the music commands.
pub mod track_metadata;
/// YouTube URL helpers.
pub mod youtube;

use regex::Regex;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::commands::music::utils::music_manager::{MusicError, MusicResult};
pub use track_metadata::TrackMetadata;
use track_metadata::YtDlpEntry;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:www\.)?.+").unwrap());

const SEARCH_PREFIXES: [&str; 2] = ["ytsearch", "scsearch"];

/// How a query resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    /// A single track from a direct URL.
    Track,
    /// Results of a text search, best match first.
    Search,
    /// Every entry of a playlist URL.
    Playlist,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub load_type: LoadType,
    pub tracks: Vec<TrackMetadata>,
    pub playlist_name: Option<String>,
}

impl LoadResult {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

pub fn is_url(query: &str) -> bool {
    URL_REGEX.is_match(query)
}

fn has_search_prefix(query: &str) -> bool {
    SEARCH_PREFIXES.iter().any(|prefix| {
        query
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()).starts_with(':'))
    })
}

/// Strip Discord's embed-suppressing `<...>` and turn plain text into a YouTube search.
pub fn normalize_query(query: &str) -> String {
    let query = query.trim().trim_start_matches('<').trim_end_matches('>');
    if is_url(query) || has_search_prefix(query) {
        query.to_string()
    } else {
        format!("ytsearch:{}", query)
    }
}

/// Build a search for up to `limit` results. `scsearch:` queries stay on
/// SoundCloud, everything else searches YouTube.
pub fn search_query(query: &str, limit: usize) -> String {
    let query = query.trim();
    if let Some(rest) = query.strip_prefix("scsearch:") {
        format!("scsearch{}:{}", limit, rest)
    } else {
        let rest = query.strip_prefix("ytsearch:").unwrap_or(query);
        format!("ytsearch{}:{}", limit, rest)
    }
}

/// Turn `yt-dlp -j` output (one JSON object per line) into a [`LoadResult`].
pub fn parse_load_output(identifier: &str, stdout: &str) -> LoadResult {
    let mut playlist_name = None;
    let mut tracks = Vec::new();

    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let entry: YtDlpEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unparsable yt-dlp line: {}", e);
                continue;
            }
        };
        if playlist_name.is_none() {
            playlist_name = entry.playlist_title.clone();
        }
        if let Some(metadata) = entry.into_metadata() {
            tracks.push(metadata);
        }
    }

    let load_type = if has_search_prefix(identifier) {
        LoadType::Search
    } else if tracks.len() > 1 {
        LoadType::Playlist
    } else {
        LoadType::Track
    };

    LoadResult {
        playlist_name: (load_type == LoadType::Playlist)
            .then(|| playlist_name.unwrap_or_else(|| "Playlist".to_string())),
        load_type,
        tracks,
    }
}

/// Runs `yt-dlp` to look tracks up.
#[derive(Debug, Clone)]
pub struct TrackLoader {
    program: String,
}

impl Default for TrackLoader {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl TrackLoader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve a URL or free-text query. Free text yields the best search hit.
    pub async fn load(&self, query: &str) -> MusicResult<LoadResult> {
        self.run(&normalize_query(query)).await
    }

    /// Search for up to `limit` tracks.
    pub async fn search(&self, query: &str, limit: usize) -> MusicResult<LoadResult> {
        self.run(&search_query(query, limit)).await
    }

    async fn run(&self, identifier: &str) -> MusicResult<LoadResult> {
        info!("Loading tracks for '{}'", identifier);
        let output = Command::new(&self.program)
            .args(["-j", "--flat-playlist", "--no-warnings", identifier])
            .output()
            .await
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() && output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} failed for '{}': {}", self.program, identifier, stderr.trim());
            return Ok(LoadResult {
                load_type: LoadType::Track,
                tracks: Vec::new(),
                playlist_name: None,
            });
        }

        let result = parse_load_output(identifier, &String::from_utf8_lossy(&output.stdout));
        debug!(
            "Loaded {} tracks ({:?}) for '{}'",
            result.tracks.len(),
            result.load_type,
            identifier
        );
        Ok(result)
    }
}
