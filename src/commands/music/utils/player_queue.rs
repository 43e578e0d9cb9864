//! Per-guild playback state that does not depend on a voice connection.

use super::music_manager::{MusicError, MusicResult};
use crate::commands::music::audio_sources::TrackMetadata;

pub const DEFAULT_VOLUME: u16 = 100;
pub const MAX_VOLUME: u16 = 1000;

#[derive(Debug, Clone)]
pub struct PlayerQueue {
    tracks: Vec<TrackMetadata>,
    current: Option<TrackMetadata>,
    previous: Option<TrackMetadata>,
    repeat: bool,
    shuffle: bool,
    volume: u16,
    paused: bool,
}

impl Default for PlayerQueue {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            previous: None,
            repeat: false,
            shuffle: false,
            volume: DEFAULT_VOLUME,
            paused: false,
        }
    }
}

impl PlayerQueue {
    pub fn tracks(&self) -> &[TrackMetadata] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current(&self) -> Option<&TrackMetadata> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&TrackMetadata> {
        self.previous.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Nothing playing and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.tracks.is_empty()
    }

    pub fn extend(&mut self, tracks: impl IntoIterator<Item = TrackMetadata>) {
        self.tracks.extend(tracks);
    }

    /// Remove the entry at a zero-based position.
    pub fn remove(&mut self, index: usize) -> Option<TrackMetadata> {
        (index < self.tracks.len()).then(|| self.tracks.remove(index))
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Forget the current track without touching the queue.
    pub fn stop(&mut self) {
        self.current = None;
        self.paused = false;
    }

    /// Move on to the next track and return it, or `None` when the queue ran out.
    pub fn advance(&mut self, ignore_shuffle: bool) -> Option<TrackMetadata> {
        self.advance_with(ignore_shuffle, |len| rand::random_range(0..len))
    }

    /// [`advance`](Self::advance) with the shuffle pick supplied by the caller.
    /// `pick` receives the queue length and returns an index below it.
    pub fn advance_with(
        &mut self,
        ignore_shuffle: bool,
        pick: impl FnOnce(usize) -> usize,
    ) -> Option<TrackMetadata> {
        if self.repeat {
            if let Some(current) = &self.current {
                self.tracks.push(current.clone());
            }
        }
        self.previous = self.current.take();
        self.paused = false;

        if self.tracks.is_empty() {
            return None;
        }

        let index = if self.shuffle && !ignore_shuffle {
            pick(self.tracks.len()).min(self.tracks.len() - 1)
        } else {
            0
        };
        let track = self.tracks.remove(index);
        self.current = Some(track.clone());
        Some(track)
    }

    /// Put the previous track at the front so the next advance replays it.
    pub fn requeue_previous(&mut self) -> MusicResult<()> {
        let previous = self.previous.clone().ok_or(MusicError::NoPreviousTrack)?;
        self.tracks.insert(0, previous);
        Ok(())
    }

    /// Put `track` at the front so the next advance plays it.
    pub fn play_next(&mut self, track: TrackMetadata) {
        self.tracks.insert(0, track);
    }

    /// Drop every entry before the zero-based `index`.
    pub fn skip_to(&mut self, index: usize) -> MusicResult<()> {
        if index >= self.tracks.len() {
            return Err(MusicError::InvalidIndex {
                index: index + 1,
                len: self.tracks.len(),
            });
        }
        self.tracks.drain(..index);
        Ok(())
    }

    pub fn volume(&self) -> u16 {
        self.volume
    }

    /// Set the volume in percent, clamped to `0..=1000`. Returns the applied value.
    pub fn set_volume(&mut self, volume: i64) -> u16 {
        self.volume = volume.clamp(0, MAX_VOLUME as i64) as u16;
        self.volume
    }

    /// Volume as the gain factor the audio driver expects.
    pub fn gain(&self) -> f32 {
        self.volume as f32 / 100.0
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
