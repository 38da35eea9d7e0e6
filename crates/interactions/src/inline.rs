//! Inline action callbacks: map specific reaction emoji to caller-supplied
//! actions on a sent message.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    event::{Emoji, ReactionEvent},
    messenger::OutboundMessage,
    registry::{ReactionHandler, RunMode},
};

/// An action invoked when its mapped emoji is added to the message.
#[async_trait]
pub trait InlineAction: Send + Sync {
    async fn run(&self, reaction: &ReactionEvent);
}

type ActionFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Closure adapter for [`InlineAction`].
pub struct FnAction {
    f: Box<dyn Fn(ReactionEvent) -> ActionFuture + Send + Sync>,
}

/// Wrap an async closure as an [`InlineAction`].
pub fn action_fn<F, Fut>(f: F) -> FnAction
where
    F: Fn(ReactionEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    FnAction {
        f: Box::new(move |reaction| Box::pin(f(reaction))),
    }
}

#[async_trait]
impl InlineAction for FnAction {
    async fn run(&self, reaction: &ReactionEvent) {
        (self.f)(reaction.clone()).await;
    }
}

/// A message with reaction-driven actions, ready to send. Emoji keys are
/// unique; mapping the same emoji twice replaces the earlier action. Display
/// order of the advertised reactions follows insertion order.
pub struct ActionReply {
    pub(crate) content: OutboundMessage,
    pub(crate) actions: Vec<(Emoji, Arc<dyn InlineAction>)>,
    pub(crate) single_use: bool,
    pub(crate) expires_after: Option<Duration>,
    pub(crate) from_requester_only: bool,
    pub(crate) run_mode: RunMode,
}

impl ActionReply {
    #[must_use]
    pub fn new(content: OutboundMessage) -> Self {
        Self {
            content,
            actions: Vec::new(),
            single_use: false,
            expires_after: None,
            from_requester_only: true,
            run_mode: RunMode::default(),
        }
    }

    /// Map an emoji to an action.
    #[must_use]
    pub fn on(mut self, emoji: Emoji, action: impl InlineAction + 'static) -> Self {
        let action: Arc<dyn InlineAction> = Arc::new(action);
        if let Some(slot) = self.actions.iter_mut().find(|(e, _)| *e == emoji) {
            slot.1 = action;
        } else {
            self.actions.push((emoji, action));
        }
        self
    }

    /// Remove the callback after its first successful invocation.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.single_use = true;
        self
    }

    /// Unregister the callback after a delay, independent of reactions.
    #[must_use]
    pub fn expire_after(mut self, delay: Duration) -> Self {
        self.expires_after = Some(delay);
        self
    }

    /// Allow any user (not just the requester) to trigger actions.
    #[must_use]
    pub fn any_user(mut self) -> Self {
        self.from_requester_only = false;
        self
    }

    #[must_use]
    pub fn run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }
}

/// The registered callback backing a live action reply.
pub(crate) struct InlineCallback {
    actions: Vec<(Emoji, Arc<dyn InlineAction>)>,
    single_use: bool,
    /// Claimed before the first action runs so near-simultaneous reactions
    /// cannot fire a single-use action twice.
    used: AtomicBool,
}

impl InlineCallback {
    pub(crate) fn new(actions: Vec<(Emoji, Arc<dyn InlineAction>)>, single_use: bool) -> Self {
        Self {
            actions,
            single_use,
            used: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ReactionHandler for InlineCallback {
    async fn handle(&self, reaction: &ReactionEvent) -> bool {
        let Some((_, action)) = self.actions.iter().find(|(e, _)| *e == reaction.emoji) else {
            return false;
        };

        if self.single_use
            && self
                .used
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            // Already claimed by a concurrent reaction; just confirm removal.
            return true;
        }

        action.run(reaction).await;
        self.single_use
    }
}
