//! Per-invocation interaction surface.
//!
//! Command handlers hold an [`InteractionContext`] and drive every
//! interactive flow through it: waiting for a follow-up message, sending a
//! pager, attaching inline actions, or plain replies.

use std::{sync::Arc, time::Duration};

use tracing::warn;

use crate::{
    Error, Result,
    criteria::{Criteria, Criterion, FromRequester, InSourceChannel, ReactionFromRequester},
    engine::Interactions,
    event::{Invocation, MessageEvent, MessageId, ReactionEvent},
    inline::{ActionReply, InlineCallback},
    messenger::{Embed, Messenger, OutboundMessage, SentMessage},
    paginator::{PagerCallback, PagerOptions, PaginatedReply, render},
    registry::ReactionCallback,
};

/// Delay before `reply_and_delete` removes its message.
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_secs(5);

/// Everything a command handler needs to run interactive flows for one
/// invocation. Cheap to clone.
#[derive(Clone)]
pub struct InteractionContext {
    messenger: Arc<dyn Messenger>,
    engine: Arc<Interactions>,
    invocation: Invocation,
}

impl InteractionContext {
    #[must_use]
    pub fn new(
        messenger: Arc<dyn Messenger>,
        engine: Arc<Interactions>,
        invocation: Invocation,
    ) -> Self {
        Self {
            messenger,
            engine,
            invocation,
        }
    }

    #[must_use]
    pub fn invocation(&self) -> Invocation {
        self.invocation
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Interactions> {
        &self.engine
    }

    #[must_use]
    pub fn messenger(&self) -> &Arc<dyn Messenger> {
        &self.messenger
    }

    /// Wait for the next message from the requester in the source channel.
    /// `None` means the timeout elapsed first.
    pub async fn wait_for_reply(&self, timeout: Option<Duration>) -> Option<MessageEvent> {
        let criterion = Arc::new(Criteria::new().with(FromRequester).with(InSourceChannel));
        self.wait_for_reply_matching(criterion, timeout).await
    }

    /// Wait for the next message satisfying an arbitrary criterion.
    pub async fn wait_for_reply_matching(
        &self,
        criterion: Arc<dyn Criterion<MessageEvent>>,
        timeout: Option<Duration>,
    ) -> Option<MessageEvent> {
        self.engine
            .wait_for_message(self.invocation, criterion, timeout)
            .await
    }

    /// Send a plain text reply to the source channel.
    pub async fn reply(&self, content: impl Into<String> + Send) -> Result<SentMessage> {
        self.messenger
            .send_message(self.invocation.channel, OutboundMessage::text(content))
            .await
    }

    /// Send an embed reply to the source channel.
    pub async fn reply_embed(&self, embed: Embed) -> Result<SentMessage> {
        self.messenger
            .send_message(self.invocation.channel, OutboundMessage::embed(embed))
            .await
    }

    /// Send a reply and delete it after a delay (default
    /// [`DEFAULT_DELETE_DELAY`]). Deletion is best-effort and detached; the
    /// send result is returned immediately.
    pub async fn reply_and_delete(
        &self,
        content: impl Into<String> + Send,
        delay: Option<Duration>,
    ) -> Result<SentMessage> {
        let sent = self.reply(content).await?;
        let delay = delay.unwrap_or(DEFAULT_DELETE_DELAY);
        let messenger = Arc::clone(&self.messenger);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = messenger.delete_message(sent.channel, sent.id).await {
                warn!(error = %e, message = %sent.id, "failed to delete timed reply");
            }
        });
        Ok(sent)
    }

    /// Send a paginated reply and wire up its navigation reactions.
    ///
    /// A single-page reply is sent as a static message with no navigation.
    /// Otherwise the pager callback is registered before the navigation
    /// reactions are attached, so a reaction arriving mid-setup already
    /// finds its callback. Display toggles such as `show_all` change
    /// rendering only; navigation stays live.
    pub async fn send_paginated(
        &self,
        reply: PaginatedReply,
        options: PagerOptions,
    ) -> Result<SentMessage> {
        if reply.pages.is_empty() {
            return Err(Error::invalid_input("paginated reply has no pages"));
        }

        let body = render(&reply, 0, &options);
        let sent = self
            .messenger
            .send_message(self.invocation.channel, body)
            .await?;

        if reply.pages.len() == 1 {
            return Ok(sent);
        }

        let controls = options.controls.clone();
        let run_mode = options.run_mode;
        let criterion = self.reaction_criterion(options.from_requester_only);
        let handler = Arc::new(PagerCallback::new(
            Arc::clone(&self.messenger),
            reply,
            options,
            sent,
        ));
        self.engine.register_callback(sent.id, ReactionCallback {
            invocation: self.invocation,
            criterion,
            handler,
            run_mode,
        });

        for emoji in controls.in_order() {
            if let Err(e) = self.messenger.add_reaction(sent.channel, sent.id, emoji).await {
                warn!(error = %e, emoji = %emoji, "failed to attach navigation reaction");
            }
        }
        Ok(sent)
    }

    /// Send a message with inline reaction actions attached.
    pub async fn send_with_actions(&self, reply: ActionReply) -> Result<SentMessage> {
        let ActionReply {
            content,
            actions,
            single_use,
            expires_after,
            from_requester_only,
            run_mode,
        } = reply;

        let sent = self
            .messenger
            .send_message(self.invocation.channel, content)
            .await?;

        let criterion = self.reaction_criterion(from_requester_only);
        let handler = Arc::new(InlineCallback::new(actions.clone(), single_use));
        self.engine.register_callback(sent.id, ReactionCallback {
            invocation: self.invocation,
            criterion,
            handler,
            run_mode,
        });

        for (emoji, _) in &actions {
            if let Err(e) = self.messenger.add_reaction(sent.channel, sent.id, emoji).await {
                warn!(error = %e, emoji = %emoji, "failed to attach action reaction");
            }
        }

        if let Some(delay) = expires_after {
            let engine = Arc::clone(&self.engine);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                engine.remove_callback(sent.id);
            });
        }
        Ok(sent)
    }

    /// Install or replace a reaction callback directly.
    pub fn register_callback(&self, message: MessageId, callback: ReactionCallback) {
        self.engine.register_callback(message, callback);
    }

    /// Remove the reaction callback for a message, if any.
    pub fn remove_callback(&self, message: MessageId) {
        self.engine.remove_callback(message);
    }

    /// Drop every registered callback on the engine.
    pub fn clear_callbacks(&self) {
        self.engine.clear_callbacks();
    }

    fn reaction_criterion(&self, from_requester_only: bool) -> Arc<dyn Criterion<ReactionEvent>> {
        if from_requester_only {
            Arc::new(Criteria::new().with(ReactionFromRequester))
        } else {
            Arc::new(Criteria::new())
        }
    }
}
