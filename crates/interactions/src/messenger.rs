//! Messaging collaborator boundary.
//!
//! Everything the engine does to the platform goes through [`Messenger`]; the
//! adapter crate provides the concrete implementation.

use async_trait::async_trait;

use crate::{
    Result,
    event::{ChannelId, Emoji, MessageId, UserId},
};

/// Embed payload in the engine's own model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub footer: Option<String>,
    pub image: Option<String>,
}

/// Outbound message payload: plain content, an embed, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
    pub embed: Option<Embed>,
}

impl OutboundMessage {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }

    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: String::new(),
            embed: Some(embed),
        }
    }
}

/// Handle to a message the engine sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub id: MessageId,
    pub channel: ChannelId,
}

/// Platform mutations consumed by the engine. Implementations must be cheap
/// to clone behind an `Arc` and safe to call concurrently.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        channel: ChannelId,
        message: OutboundMessage,
    ) -> Result<SentMessage>;

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: OutboundMessage,
    ) -> Result<()>;

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> Result<()>;

    /// Remove one user's reaction.
    async fn remove_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &Emoji,
    ) -> Result<()>;

    /// Remove every reaction on a message.
    async fn remove_all_reactions(&self, channel: ChannelId, message: MessageId) -> Result<()>;
}
