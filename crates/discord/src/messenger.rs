//! Discord-backed [`Messenger`] implementation.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{
            ChannelId as WireChannelId, MessageId as WireMessageId, UserId as WireUserId,
        },
        builder::{CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage},
        http::Http,
    },
};

use palaver_interactions::{
    ChannelId, Embed, Emoji, Error, MessageId, Messenger, OutboundMessage, Result, SentMessage,
    UserId,
};

use crate::convert::to_reaction_type;

fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(image) = &embed.image {
        builder = builder.image(image);
    }
    builder
}

/// Sends engine effects through the serenity HTTP client.
pub struct SerenityMessenger {
    http: Arc<Http>,
}

impl SerenityMessenger {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Messenger for SerenityMessenger {
    async fn send_message(
        &self,
        channel: ChannelId,
        message: OutboundMessage,
    ) -> Result<SentMessage> {
        let mut builder = CreateMessage::new();
        if !message.content.is_empty() {
            builder = builder.content(&message.content);
        }
        if let Some(embed) = &message.embed {
            builder = builder.embed(build_embed(embed));
        }

        let sent = WireChannelId::new(channel.0)
            .send_message(&*self.http, builder)
            .await
            .map_err(|e| Error::platform("send message", e))?;
        Ok(SentMessage {
            id: MessageId(sent.id.get()),
            channel,
        })
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: OutboundMessage,
    ) -> Result<()> {
        let mut builder = EditMessage::new().content(content.content.clone());
        if let Some(embed) = &content.embed {
            builder = builder.embed(build_embed(embed));
        }

        WireChannelId::new(channel.0)
            .edit_message(&*self.http, WireMessageId::new(message.0), builder)
            .await
            .map_err(|e| Error::platform("edit message", e))?;
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        WireChannelId::new(channel.0)
            .delete_message(&*self.http, WireMessageId::new(message.0))
            .await
            .map_err(|e| Error::platform("delete message", e))
    }

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> Result<()> {
        self.http
            .create_reaction(
                WireChannelId::new(channel.0),
                WireMessageId::new(message.0),
                &to_reaction_type(emoji),
            )
            .await
            .map_err(|e| Error::platform("add reaction", e))
    }

    async fn remove_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &Emoji,
    ) -> Result<()> {
        self.http
            .delete_reaction(
                WireChannelId::new(channel.0),
                WireMessageId::new(message.0),
                WireUserId::new(user.0),
                &to_reaction_type(emoji),
            )
            .await
            .map_err(|e| Error::platform("remove reaction", e))
    }

    async fn remove_all_reactions(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.http
            .delete_message_reactions(
                WireChannelId::new(channel.0),
                WireMessageId::new(message.0),
            )
            .await
            .map_err(|e| Error::platform("clear reactions", e))
    }
}
