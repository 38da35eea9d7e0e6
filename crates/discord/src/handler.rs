//! Discord event handler for serenity.
//!
//! Bridges gateway events into the interaction engine's own event model.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, Message, Reaction, Ready},
        async_trait,
    },
    tracing::{info, trace},
};

use palaver_interactions::{
    ChannelId, Interactions, MessageEvent, MessageId, ReactionEvent, UserId,
};

use crate::convert::from_reaction_type;

/// Feeds gateway events to an [`Interactions`] engine.
pub struct EngineBridge {
    pub engine: Arc<Interactions>,
}

impl EngineBridge {
    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::DIRECT_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for EngineBridge {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
        self.engine.set_identity(UserId(ready.user.id.get()));
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        // Skip our own messages to prevent loops; other bots pass through
        // with the flag set so criteria can decide.
        if self.engine.identity() == Some(UserId(msg.author.id.get())) {
            return;
        }

        self.engine.dispatch_message(MessageEvent {
            id: MessageId(msg.id.get()),
            channel: ChannelId(msg.channel_id.get()),
            author: UserId(msg.author.id.get()),
            author_is_bot: msg.author.bot,
            content: msg.content.clone(),
        });
    }

    async fn reaction_add(&self, _ctx: Context, add_reaction: Reaction) {
        // Reactions delivered without a user id cannot be judged.
        let Some(user_id) = add_reaction.user_id else {
            trace!(message = %add_reaction.message_id, "reaction without user id");
            return;
        };

        self.engine.dispatch_reaction(ReactionEvent {
            message: MessageId(add_reaction.message_id.get()),
            channel: ChannelId(add_reaction.channel_id.get()),
            user: UserId(user_id.get()),
            emoji: from_reaction_type(&add_reaction.emoji),
        });
    }
}
