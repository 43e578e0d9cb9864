//! The chat operations a [`Selector`](super::Selector) needs, and their
//! serenity implementation.

use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateMessage, EditMessage, MessageId, ReactionCollector,
    ReactionType, UserId,
};
use serenity::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::utils::paginator::Page;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Discord API error: {0}")]
    Discord(#[from] serenity::Error),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// A reaction added to some message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub user_id: Option<UserId>,
    pub glyph: String,
}

/// Message and reaction operations on one channel.
#[async_trait]
pub trait ReactionSurface: Send + Sync + 'static {
    /// Post a page as a new message.
    async fn send(&self, page: &Page) -> SurfaceResult<MessageId>;

    /// Replace the content of a message with `page`.
    async fn edit(&self, message: MessageId, page: &Page) -> SurfaceResult<()>;

    async fn add_reaction(&self, message: MessageId, glyph: &str) -> SurfaceResult<()>;

    async fn remove_reaction(
        &self,
        message: MessageId,
        glyph: &str,
        user: UserId,
    ) -> SurfaceResult<()>;

    async fn clear_reactions(&self, message: MessageId) -> SurfaceResult<()>;

    /// Wait up to `timeout` for the next reaction added to `message`.
    /// Returns `None` on timeout.
    async fn next_reaction(&self, message: MessageId, timeout: Duration) -> Option<ReactionEvent>;
}

/// Run a cleanup operation whose failure must not affect the caller.
pub async fn best_effort<T>(operation: &str, fut: impl Future<Output = SurfaceResult<T>>) {
    if let Err(e) = fut.await {
        debug!("Ignoring failed {}: {}", operation, e);
    }
}

/// [`ReactionSurface`] backed by the bot's HTTP client and gateway collectors.
#[derive(Clone)]
pub struct SerenitySurface {
    ctx: serenity::Context,
    channel_id: ChannelId,
}

impl SerenitySurface {
    pub fn new(ctx: serenity::Context, channel_id: ChannelId) -> Self {
        Self { ctx, channel_id }
    }
}

fn unicode(glyph: &str) -> ReactionType {
    ReactionType::Unicode(glyph.to_string())
}

#[async_trait]
impl ReactionSurface for SerenitySurface {
    async fn send(&self, page: &Page) -> SurfaceResult<MessageId> {
        let message = self
            .channel_id
            .send_message(&self.ctx.http, CreateMessage::new().embed(page.to_embed()))
            .await?;
        Ok(message.id)
    }

    async fn edit(&self, message: MessageId, page: &Page) -> SurfaceResult<()> {
        self.channel_id
            .edit_message(&self.ctx.http, message, EditMessage::new().embed(page.to_embed()))
            .await?;
        Ok(())
    }

    async fn add_reaction(&self, message: MessageId, glyph: &str) -> SurfaceResult<()> {
        self.channel_id
            .create_reaction(&self.ctx.http, message, unicode(glyph))
            .await?;
        Ok(())
    }

    async fn remove_reaction(
        &self,
        message: MessageId,
        glyph: &str,
        user: UserId,
    ) -> SurfaceResult<()> {
        self.channel_id
            .delete_reaction(&self.ctx.http, message, Some(user), unicode(glyph))
            .await?;
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageId) -> SurfaceResult<()> {
        self.channel_id
            .delete_reactions(&self.ctx.http, message)
            .await?;
        Ok(())
    }

    async fn next_reaction(&self, message: MessageId, timeout: Duration) -> Option<ReactionEvent> {
        let reaction = ReactionCollector::new(&self.ctx)
            .channel_id(self.channel_id)
            .message_id(message)
            .timeout(timeout)
            .next()
            .await?;

        Some(ReactionEvent {
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            glyph: reaction.emoji.to_string(),
        })
    }
}
