use dashmap::DashMap;
use poise::serenity_prelude::{self as serenity, ChannelId, CreateMessage, GuildId, UserId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::YoutubeDl;
use songbird::tracks::{Track, TrackHandle};
use songbird::{Call, Event, Songbird, TrackEvent};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::embedded_messages;
use super::event_handlers::TrackEndNotifier;
use super::player_queue::PlayerQueue;
use crate::commands::music::audio_sources::{TrackLoader, TrackMetadata};

pub const QUEUE_ENDED: &str = "Queue ended! Why not queue more songs?";

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected.")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("You aren't connected to any voice channel.")]
    UserNotInVoiceChannel,

    #[error("Join my voice channel!")]
    JoinMyChannel,

    #[error("You're not in my voice channel!")]
    NotInMyChannel,

    #[error("Not playing.")]
    NothingPlaying,

    #[error("There is no previous song to play.")]
    NoPreviousTrack,

    #[error("Index {index} is out of range for a queue of {len} tracks")]
    InvalidIndex { index: usize, len: usize },

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

impl From<songbird::tracks::ControlError> for MusicError {
    fn from(e: songbird::tracks::ControlError) -> Self {
        MusicError::Playback(e.to_string())
    }
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// One guild's queue plus the handle of the track the driver is playing.
#[derive(Default)]
pub struct GuildPlayer {
    pub queue: PlayerQueue,
    handle: Option<TrackHandle>,
    // Bumped whenever the playing track is replaced or stopped, so end
    // events from older tracks can be told apart.
    generation: u64,
    text_channel: Option<ChannelId>,
}

impl GuildPlayer {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Channel where track changes are announced.
    pub fn text_channel(&self) -> Option<ChannelId> {
        self.text_channel
    }

    pub fn set_text_channel(&mut self, channel_id: ChannelId) {
        self.text_channel = Some(channel_id);
    }

    fn stop_audio(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.stop() {
                debug!("Stopping finished track: {}", e);
            }
        }
    }
}

/// Owns every guild's player and drives songbird.
pub struct MusicService {
    players: DashMap<GuildId, Arc<Mutex<GuildPlayer>>>,
    http: reqwest::Client,
    loader: TrackLoader,
}

impl MusicService {
    pub fn new(http: reqwest::Client, loader: TrackLoader) -> Self {
        Self {
            players: DashMap::new(),
            http,
            loader,
        }
    }

    pub fn loader(&self) -> &TrackLoader {
        &self.loader
    }

    /// The guild's player, created on first use.
    pub fn player(&self, guild_id: GuildId) -> Arc<Mutex<GuildPlayer>> {
        self.players.entry(guild_id).or_default().clone()
    }

    /// Run `f` against the guild's player under its lock.
    pub async fn with_player<T>(&self, guild_id: GuildId, f: impl FnOnce(&mut GuildPlayer) -> T) -> T {
        let player = self.player(guild_id);
        let mut player = player.lock().await;
        f(&mut player)
    }

    /// Get the Songbird voice client from the context
    pub async fn songbird(ctx: &serenity::Context) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Get the current voice channel call handle
    pub async fn call(
        ctx: &serenity::Context,
        guild_id: GuildId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::songbird(ctx).await?;
        songbird.get(guild_id).ok_or(MusicError::NotConnected)
    }

    /// Get the voice channel ID that the user is currently in
    pub fn user_voice_channel(
        ctx: &serenity::Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;
        guild
            .voice_states
            .get(&user_id)
            .and_then(|voice_state| voice_state.channel_id)
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// The voice channel the bot is connected to in this guild.
    pub async fn connected_channel(
        ctx: &serenity::Context,
        guild_id: GuildId,
    ) -> MusicResult<Option<ChannelId>> {
        let songbird = Self::songbird(ctx).await?;
        let Some(call) = songbird.get(guild_id) else {
            return Ok(None);
        };
        let channel = call.lock().await.current_channel();
        Ok(channel.map(|channel| ChannelId::new(channel.0.get())))
    }

    /// Join the author's voice channel if the bot is not connected yet.
    /// Once connected, the author has to be in the bot's channel.
    pub async fn ensure_voice(
        &self,
        ctx: &serenity::Context,
        guild_id: GuildId,
        user_id: UserId,
        text_channel: ChannelId,
    ) -> MusicResult<()> {
        let user_channel = Self::user_voice_channel(ctx, guild_id, user_id);

        match Self::connected_channel(ctx, guild_id).await? {
            Some(current) if user_channel.as_ref().ok() == Some(&current) => Ok(()),
            Some(_) => Err(MusicError::JoinMyChannel),
            None => {
                let channel_id = user_channel?;
                self.with_player(guild_id, |player| player.set_text_channel(text_channel))
                    .await;

                let songbird = Self::songbird(ctx).await?;
                if let Err(err) = songbird.join(guild_id, channel_id).await {
                    error!(
                        "Failed to join voice channel {} for guild {}: {}",
                        channel_id, guild_id, err
                    );
                    return Err(MusicError::JoinError(err.to_string()));
                }
                info!("Joined voice channel {} in guild {}", channel_id, guild_id);
                Ok(())
            }
        }
    }

    /// Advance the queue and start the next track. Returns the track now
    /// playing, or `None` when the queue ran out.
    pub async fn play(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        ignore_shuffle: bool,
    ) -> MusicResult<Option<TrackMetadata>> {
        let call = Self::call(ctx, guild_id).await?;
        let player = self.player(guild_id);
        let mut player = player.lock().await;

        player.stop_audio();
        let Some(track) = player.queue.advance(ignore_shuffle) else {
            let channel = player.text_channel();
            drop(player);
            info!("Queue ended for guild {}", guild_id);
            if let Some(channel) = channel {
                announce(ctx, channel, CreateMessage::new().content(QUEUE_ENDED)).await;
            }
            return Ok(None);
        };

        let source = YoutubeDl::new(self.http.clone(), track.url.clone());
        let handle = call
            .lock()
            .await
            .play_only(Track::from(source).volume(player.queue.gain()));

        let notifier = TrackEndNotifier::new(
            ctx.clone(),
            Arc::clone(self),
            guild_id,
            player.generation(),
        );
        for event in [TrackEvent::End, TrackEvent::Error] {
            if let Err(e) = handle.add_event(Event::Track(event), notifier.clone()) {
                warn!("Failed to register track event for guild {}: {}", guild_id, e);
            }
        }
        player.handle = Some(handle);

        let channel = player.text_channel();
        drop(player);

        info!("Now playing '{}' in guild {}", track.title, guild_id);
        if let Some(channel) = channel {
            let embed = embedded_messages::now_playing_announcement(&track);
            announce(ctx, channel, CreateMessage::new().embed(embed)).await;
        }
        Ok(Some(track))
    }

    /// Called when a track stops on its own. Ignored if the track was
    /// already replaced.
    pub async fn on_track_end(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        generation: u64,
    ) {
        let current = self.with_player(guild_id, |player| player.generation()).await;
        if current != generation {
            debug!(
                "Ignoring end of superseded track in guild {} ({} != {})",
                guild_id, generation, current
            );
            return;
        }

        if let Err(e) = self.play(ctx, guild_id, false).await {
            error!("Failed to advance queue for guild {}: {}", guild_id, e);
        }
    }

    /// Append tracks and start playback if nothing is playing.
    pub async fn enqueue(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        tracks: Vec<TrackMetadata>,
    ) -> MusicResult<()> {
        let idle = self
            .with_player(guild_id, |player| {
                player.queue.extend(tracks);
                !player.queue.is_playing()
            })
            .await;

        if idle {
            self.play(ctx, guild_id, false).await?;
        }
        Ok(())
    }

    /// Make sure the bot is in the requester's channel, then enqueue one track.
    pub async fn send_to_play(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        user_id: UserId,
        text_channel: ChannelId,
        track: TrackMetadata,
    ) -> MusicResult<()> {
        self.ensure_voice(ctx, guild_id, user_id, text_channel).await?;
        self.enqueue(ctx, guild_id, vec![track.with_requester(user_id)])
            .await
    }

    /// Interrupt the current track with `track`. `rest` goes to the back of the queue.
    pub async fn play_now(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        track: TrackMetadata,
        rest: Vec<TrackMetadata>,
    ) -> MusicResult<Option<TrackMetadata>> {
        self.with_player(guild_id, |player| {
            player.queue.extend(rest);
            player.queue.play_next(track);
        })
        .await;
        self.play(ctx, guild_id, true).await
    }

    pub async fn play_previous(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
    ) -> MusicResult<Option<TrackMetadata>> {
        self.with_player(guild_id, |player| player.queue.requeue_previous())
            .await?;
        self.play(ctx, guild_id, true).await
    }

    /// Play the zero-based queue entry `index`, dropping everything before it.
    pub async fn play_at(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
        index: usize,
    ) -> MusicResult<Option<TrackMetadata>> {
        self.with_player(guild_id, |player| player.queue.skip_to(index))
            .await?;
        self.play(ctx, guild_id, true).await
    }

    pub async fn skip(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: GuildId,
    ) -> MusicResult<Option<TrackMetadata>> {
        let playing = self
            .with_player(guild_id, |player| player.queue.is_playing())
            .await;
        if !playing {
            return Err(MusicError::NothingPlaying);
        }
        self.play(ctx, guild_id, false).await
    }

    /// Clear the queue and stop the current track.
    pub async fn stop(&self, guild_id: GuildId) -> MusicResult<()> {
        self.with_player(guild_id, |player| {
            if !player.queue.is_playing() {
                return Err(MusicError::NothingPlaying);
            }
            player.queue.clear();
            player.stop_audio();
            player.queue.stop();
            Ok(())
        })
        .await?;
        info!("Stopped playback in guild {}", guild_id);
        Ok(())
    }

    /// Toggle pause. Returns whether the player is now paused.
    pub async fn toggle_pause(&self, guild_id: GuildId) -> MusicResult<bool> {
        self.with_player(guild_id, |player| {
            let handle = player.handle.clone().ok_or(MusicError::NothingPlaying)?;
            if !player.queue.is_playing() {
                return Err(MusicError::NothingPlaying);
            }
            let paused = !player.queue.paused();
            if paused {
                handle.pause()?;
            } else {
                handle.play()?;
            }
            player.queue.set_paused(paused);
            Ok(paused)
        })
        .await
    }

    /// Set the volume in percent. Returns the clamped value in effect.
    pub async fn set_volume(&self, guild_id: GuildId, volume: i64) -> MusicResult<u16> {
        self.with_player(guild_id, |player| {
            let applied = player.queue.set_volume(volume);
            if let Some(handle) = &player.handle {
                handle.set_volume(player.queue.gain())?;
            }
            Ok(applied)
        })
        .await
    }

    /// Where the current track is, if one is playing.
    pub async fn position(&self, guild_id: GuildId) -> Option<Duration> {
        let handle = self
            .with_player(guild_id, |player| player.handle.clone())
            .await?;
        match handle.get_info().await {
            Ok(state) => Some(state.position),
            Err(e) => {
                debug!("No track state for guild {}: {}", guild_id, e);
                None
            }
        }
    }

    /// Move the current track by `offset_secs`. Returns the new position.
    pub async fn seek(&self, guild_id: GuildId, offset_secs: i64) -> MusicResult<Duration> {
        let handle = self
            .with_player(guild_id, |player| {
                player
                    .queue
                    .is_playing()
                    .then(|| player.handle.clone())
                    .flatten()
            })
            .await
            .ok_or(MusicError::NothingPlaying)?;

        let position = handle.get_info().await?.position;
        let target = seek_target(position, offset_secs);
        handle.seek_async(target).await?;
        debug!("Seeked guild {} to {:?}", guild_id, target);
        Ok(target)
    }

    /// Clear the queue and leave. The author has to share the bot's channel.
    pub async fn disconnect(
        &self,
        ctx: &serenity::Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<()> {
        let current = Self::connected_channel(ctx, guild_id)
            .await?
            .ok_or(MusicError::NotConnected)?;
        if Self::user_voice_channel(ctx, guild_id, user_id).ok() != Some(current) {
            return Err(MusicError::NotInMyChannel);
        }

        self.with_player(guild_id, |player| {
            player.queue.clear();
            player.stop_audio();
            player.queue.stop();
        })
        .await;

        let songbird = Self::songbird(ctx).await?;
        songbird
            .remove(guild_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        info!("Left voice channel {} in guild {}", current, guild_id);
        Ok(())
    }
}

/// `position` moved by `offset_secs`, never before the start of the track.
pub fn seek_target(position: Duration, offset_secs: i64) -> Duration {
    let offset = Duration::from_secs(offset_secs.unsigned_abs());
    if offset_secs < 0 {
        position.saturating_sub(offset)
    } else {
        position + offset
    }
}

async fn announce(ctx: &serenity::Context, channel: ChannelId, message: CreateMessage) {
    if let Err(e) = channel.send_message(&ctx.http, message).await {
        warn!("Failed to announce in channel {}: {}", channel, e);
    }
}
