use std::sync::Arc;

use poise::serenity_prelude as serenity;
use serenity::async_trait;
use songbird::tracks::PlayMode;
use tracing::{info, warn};

use super::music_manager::MusicService;

/// Event handler for when a track ends or fails
#[derive(Clone)]
pub struct TrackEndNotifier {
    ctx: serenity::Context,
    service: Arc<MusicService>,
    guild_id: serenity::GuildId,
    generation: u64,
}

impl TrackEndNotifier {
    pub fn new(
        ctx: serenity::Context,
        service: Arc<MusicService>,
        guild_id: serenity::GuildId,
        generation: u64,
    ) -> Self {
        Self {
            ctx,
            service,
            guild_id,
            generation,
        }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(tracks) = ctx {
            for (state, _) in tracks.iter() {
                if let PlayMode::Errored(e) = &state.playing {
                    warn!("Track failed in guild {}: {}", self.guild_id, e);
                }
            }
            info!("Track ended for guild {}", self.guild_id);
            self.service
                .on_track_end(&self.ctx, self.guild_id, self.generation)
                .await;
        }
        None
    }
}
