//! Connection-scoped interaction engine.
//!
//! One [`Interactions`] instance lives for the duration of a platform
//! connection: constructed when the connection is established, cleared when
//! it closes. The gateway adapter feeds `dispatch_message` / `dispatch_reaction`
//! and must never be blocked by them, so handling is spawned per event.

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use tracing::{debug, info, trace};

use crate::{
    criteria::Criterion,
    event::{Invocation, MessageEvent, MessageId, ReactionEvent, UserId},
    registry::{CallbackRegistry, ReactionCallback},
    waiter::WaitRoster,
};

/// Deadline for `wait_for_message` when the caller gives none.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Interactions {
    registry: CallbackRegistry,
    waits: WaitRoster,
    default_timeout: Duration,
    /// The bot's own user id, recorded once the gateway reports ready.
    /// Reactions from this identity are ignored to prevent feedback loops.
    identity: OnceLock<UserId>,
}

impl Default for Interactions {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT_TIMEOUT)
    }
}

impl Interactions {
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            registry: CallbackRegistry::new(),
            waits: WaitRoster::new(),
            default_timeout,
            identity: OnceLock::new(),
        }
    }

    pub fn set_identity(&self, user: UserId) {
        if self.identity.set(user).is_ok() {
            info!(user = %user, "interaction engine identity set");
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<UserId> {
        self.identity.get().copied()
    }

    /// Suspend until a message matching `criterion` arrives, or until the
    /// timeout elapses. Timing out is a normal outcome, not a failure.
    ///
    /// Concurrent waits are fully independent; one message may resolve any
    /// number of them. The subscription is removed on every exit path,
    /// including cancellation of this future, via the roster guard.
    pub async fn wait_for_message(
        &self,
        invocation: Invocation,
        criterion: Arc<dyn Criterion<MessageEvent>>,
        timeout: Option<Duration>,
    ) -> Option<MessageEvent> {
        let deadline = timeout.unwrap_or(self.default_timeout);
        let (guard, rx) = self.waits.subscribe(invocation, criterion);
        let outcome = tokio::time::timeout(deadline, rx).await;
        drop(guard);
        match outcome {
            Ok(Ok(event)) => Some(event),
            _ => None,
        }
    }

    /// Install or replace the reaction callback for a message.
    pub fn register_callback(&self, message: MessageId, callback: ReactionCallback) {
        self.registry.register(message, callback);
    }

    /// Remove the reaction callback for a message, if any.
    pub fn remove_callback(&self, message: MessageId) {
        self.registry.remove(message);
    }

    /// Drop every registered callback. Used at connection teardown.
    pub fn clear_callbacks(&self) {
        self.registry.clear();
    }

    #[must_use]
    pub fn callback_registered(&self, message: MessageId) -> bool {
        self.registry.contains(message)
    }

    #[must_use]
    pub fn active_callbacks(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn pending_waits(&self) -> usize {
        self.waits.pending()
    }

    /// Route an inbound message to every pending wait. Never blocks the
    /// caller beyond spawning per-wait evaluation.
    pub fn dispatch_message(&self, event: MessageEvent) {
        trace!(message = %event.id, channel = %event.channel, "dispatching message event");
        self.waits.deliver(&event);
    }

    /// Route a reaction to the callback registered for its message, if any.
    /// Handling is spawned so the gateway delivery path is never stalled.
    pub fn dispatch_reaction(&self, reaction: ReactionEvent) {
        if self.identity() == Some(reaction.user) {
            trace!(message = %reaction.message, "ignoring own reaction");
            return;
        }
        let registry = self.registry.clone();
        tokio::spawn(async move {
            registry.dispatch(reaction).await;
        });
    }

    /// Tear down: drop all pending waits and callbacks. Outstanding
    /// `wait_for_message` calls resolve as timeouts.
    pub fn shutdown(&self) {
        let waits = self.waits.pending();
        let callbacks = self.registry.len();
        self.waits.clear();
        self.registry.clear();
        debug!(waits, callbacks, "interaction engine cleared");
    }
}
