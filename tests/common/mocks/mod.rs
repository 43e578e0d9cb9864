//! Mock implementations for external dependencies
//! This module contains fake chat surfaces used for testing the selector

use async_trait::async_trait;
use mockall::mock;
use poise::serenity_prelude::{MessageId, UserId};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

use roxbot::utils::paginator::Page;
use roxbot::utils::selector::surface::{ReactionEvent, ReactionSurface, SurfaceResult};

use super::fixtures::PROMPT_MESSAGE_ID;

/// Everything the selector asked the surface to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Send(String),
    Edit(MessageId, String),
    AddReaction(MessageId, String),
    RemoveReaction(MessageId, String, UserId),
    ClearReactions(MessageId),
}

/// In-memory surface. Reactions are queued up front with [`ScriptedSurface::react`]
/// and delivered in order; once they run out, waits end at their timeout.
pub struct ScriptedSurface {
    message_id: MessageId,
    calls: Mutex<Vec<SurfaceCall>>,
    sender: mpsc::UnboundedSender<ReactionEvent>,
    reactions: tokio::sync::Mutex<mpsc::UnboundedReceiver<ReactionEvent>>,
}

impl Default for ScriptedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSurface {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            message_id: MessageId::new(PROMPT_MESSAGE_ID),
            calls: Mutex::new(Vec::new()),
            sender,
            reactions: tokio::sync::Mutex::new(receiver),
        }
    }

    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Queue a reaction by `user` on the prompt message.
    pub fn react(&self, user: u64, glyph: &str) {
        self.react_on(self.message_id, user, glyph);
    }

    pub fn react_on(&self, message_id: MessageId, user: u64, glyph: &str) {
        self.sender
            .send(ReactionEvent {
                message_id,
                user_id: Some(UserId::new(user)),
                glyph: glyph.to_string(),
            })
            .expect("receiver lives as long as the surface");
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reactions_added(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::AddReaction(_, glyph) => Some(glyph),
                _ => None,
            })
            .collect()
    }

    /// Descriptions of the pages shown through edits.
    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Edit(_, description) => Some(description),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::ClearReactions(_)))
            .count()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReactionSurface for ScriptedSurface {
    async fn send(&self, page: &Page) -> SurfaceResult<MessageId> {
        self.record(SurfaceCall::Send(page.description.clone()));
        Ok(self.message_id)
    }

    async fn edit(&self, message: MessageId, page: &Page) -> SurfaceResult<()> {
        self.record(SurfaceCall::Edit(message, page.description.clone()));
        Ok(())
    }

    async fn add_reaction(&self, message: MessageId, glyph: &str) -> SurfaceResult<()> {
        self.record(SurfaceCall::AddReaction(message, glyph.to_string()));
        Ok(())
    }

    async fn remove_reaction(
        &self,
        message: MessageId,
        glyph: &str,
        user: UserId,
    ) -> SurfaceResult<()> {
        self.record(SurfaceCall::RemoveReaction(message, glyph.to_string(), user));
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageId) -> SurfaceResult<()> {
        self.record(SurfaceCall::ClearReactions(message));
        Ok(())
    }

    async fn next_reaction(&self, _message: MessageId, timeout: Duration) -> Option<ReactionEvent> {
        let mut reactions = self.reactions.lock().await;
        tokio::time::timeout(timeout, reactions.recv())
            .await
            .ok()
            .flatten()
    }
}

// Surface with per-test expectations, for failure paths.
mock! {
    pub Surface {}

    #[async_trait]
    impl ReactionSurface for Surface {
        async fn send(&self, page: &Page) -> SurfaceResult<MessageId>;
        async fn edit(&self, message: MessageId, page: &Page) -> SurfaceResult<()>;
        async fn add_reaction(&self, message: MessageId, glyph: &str) -> SurfaceResult<()>;
        async fn remove_reaction(
            &self,
            message: MessageId,
            glyph: &str,
            user: UserId,
        ) -> SurfaceResult<()>;
        async fn clear_reactions(&self, message: MessageId) -> SurfaceResult<()>;
        async fn next_reaction(&self, message: MessageId, timeout: Duration) -> Option<ReactionEvent>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_reactions_arrive_in_order_then_time_out() {
        let surface = ScriptedSurface::new();
        surface.react(1, "a");
        surface.react(2, "b");

        let wait = Duration::from_millis(20);
        let first = surface.next_reaction(surface.message_id(), wait).await.unwrap();
        let second = surface.next_reaction(surface.message_id(), wait).await.unwrap();
        assert_eq!(first.glyph, "a");
        assert_eq!(second.user_id, Some(UserId::new(2)));
        assert_eq!(surface.next_reaction(surface.message_id(), wait).await, None);
    }
}
