//! Reaction callback registry.
//!
//! Maps message identity to the active reaction callback for that message.
//! Registration is last-write-wins; removal is idempotent; exhaustion under
//! concurrent qualifying reactions resolves to exactly one removal.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use {
    async_trait::async_trait,
    dashmap::DashMap,
    tracing::{debug, trace},
};

use crate::{
    criteria::Criterion,
    event::{Invocation, MessageId, ReactionEvent},
};

/// Whether a callback's handling runs inline on the dispatch task or as
/// independently spawned work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Handle inline on the dispatch path.
    #[default]
    Sequential,
    /// Spawn handling so a slow handler cannot stall later events.
    Independent,
}

/// An active reaction callback. Returns `true` from [`handle`] when it is
/// exhausted and should be removed from the registry.
///
/// [`handle`]: ReactionHandler::handle
#[async_trait]
pub trait ReactionHandler: Send + Sync {
    async fn handle(&self, reaction: &ReactionEvent) -> bool;
}

/// Everything needed to register a callback for a message.
pub struct ReactionCallback {
    pub invocation: Invocation,
    pub criterion: Arc<dyn Criterion<ReactionEvent>>,
    pub handler: Arc<dyn ReactionHandler>,
    pub run_mode: RunMode,
}

struct Registration {
    /// Monotonic registration identity; exhaustion removes the map entry only
    /// while it still holds this registration, so a replacement registered in
    /// the meantime survives.
    token: u64,
    callback: ReactionCallback,
    exhausted: AtomicBool,
}

#[derive(Clone)]
pub(crate) struct CallbackRegistry {
    next_token: Arc<AtomicU64>,
    entries: Arc<DashMap<MessageId, Arc<Registration>>>,
}

impl CallbackRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_token: Arc::new(AtomicU64::new(0)),
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Install or replace the callback for a message. The registration is
    /// fully constructed before it becomes visible to dispatch.
    pub(crate) fn register(&self, message: MessageId, callback: ReactionCallback) {
        let registration = Arc::new(Registration {
            token: self.next_token.fetch_add(1, Ordering::Relaxed),
            callback,
            exhausted: AtomicBool::new(false),
        });
        self.entries.insert(message, registration);
    }

    /// Remove the callback for a message, if any. Idempotent.
    pub(crate) fn remove(&self, message: MessageId) {
        self.entries.remove(&message);
    }

    pub(crate) fn contains(&self, message: MessageId) -> bool {
        self.entries.contains_key(&message)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    /// Route a reaction to the callback registered for its message, if any.
    pub(crate) async fn dispatch(&self, reaction: ReactionEvent) {
        let Some(entry) = self
            .entries
            .get(&reaction.message)
            .map(|e| Arc::clone(e.value()))
        else {
            trace!(message = %reaction.message, "reaction on untracked message");
            return;
        };

        if entry.exhausted.load(Ordering::Acquire) {
            return;
        }

        let callback = &entry.callback;
        if !callback
            .criterion
            .judge(&callback.invocation, &reaction)
            .await
        {
            debug!(
                message = %reaction.message,
                emoji = %reaction.emoji,
                "reaction rejected by callback criterion"
            );
            return;
        }

        match callback.run_mode {
            RunMode::Independent => {
                let registry = self.clone();
                tokio::spawn(async move {
                    registry.run_handler(entry, reaction).await;
                });
            },
            RunMode::Sequential => self.run_handler(entry, reaction).await,
        }
    }

    async fn run_handler(&self, entry: Arc<Registration>, reaction: ReactionEvent) {
        if entry.exhausted.load(Ordering::Acquire) {
            return;
        }

        if entry.callback.handler.handle(&reaction).await
            && entry
                .exhausted
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            debug!(message = %reaction.message, "callback exhausted, removing");
            self.entries
                .remove_if(&reaction.message, |_, e| e.token == entry.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::{
        criteria::{Criteria, ReactionFromRequester},
        event::{ChannelId, Emoji, UserId},
    };

    fn invocation() -> Invocation {
        Invocation {
            user: UserId(1),
            channel: ChannelId(10),
            message: MessageId(100),
            guild: None,
        }
    }

    fn reaction(user: u64) -> ReactionEvent {
        ReactionEvent {
            message: MessageId(100),
            channel: ChannelId(10),
            user: UserId(user),
            emoji: Emoji::unicode("👍"),
        }
    }

    struct Counting {
        fires: Arc<AtomicUsize>,
        exhaust: bool,
    }

    #[async_trait]
    impl ReactionHandler for Counting {
        async fn handle(&self, _reaction: &ReactionEvent) -> bool {
            self.fires.fetch_add(1, Ordering::SeqCst);
            self.exhaust
        }
    }

    fn callback(fires: &Arc<AtomicUsize>, exhaust: bool) -> ReactionCallback {
        ReactionCallback {
            invocation: invocation(),
            criterion: Arc::new(Criteria::new().with(ReactionFromRequester)),
            handler: Arc::new(Counting {
                fires: Arc::clone(fires),
                exhaust,
            }),
            run_mode: RunMode::Sequential,
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_registered_handler() {
        let registry = CallbackRegistry::new();
        let fires = Arc::new(AtomicUsize::new(0));
        registry.register(MessageId(100), callback(&fires, false));

        registry.dispatch(reaction(1)).await;
        assert_eq!(fires.load(Ordering::SeqCst), 1);
        assert!(registry.contains(MessageId(100)));
    }

    #[tokio::test]
    async fn untracked_message_is_ignored() {
        let registry = CallbackRegistry::new();
        registry.dispatch(reaction(1)).await;
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn criterion_rejection_leaves_entry_untouched() {
        let registry = CallbackRegistry::new();
        let fires = Arc::new(AtomicUsize::new(0));
        registry.register(MessageId(100), callback(&fires, true));

        // Reaction from the wrong user: ignored, entry stays.
        registry.dispatch(reaction(9)).await;
        assert_eq!(fires.load(Ordering::SeqCst), 0);
        assert!(registry.contains(MessageId(100)));
    }

    #[tokio::test]
    async fn exhaustion_removes_entry() {
        let registry = CallbackRegistry::new();
        let fires = Arc::new(AtomicUsize::new(0));
        registry.register(MessageId(100), callback(&fires, true));

        registry.dispatch(reaction(1)).await;
        assert_eq!(fires.load(Ordering::SeqCst), 1);
        assert!(!registry.contains(MessageId(100)));

        // A further reaction is a registry miss, not a second fire.
        registry.dispatch(reaction(1)).await;
        assert_eq!(fires.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_exhaustion_resolves_to_one_removal() {
        let registry = CallbackRegistry::new();
        let fires = Arc::new(AtomicUsize::new(0));
        registry.register(MessageId(100), callback(&fires, true));

        let a = registry.clone();
        let b = registry.clone();
        tokio::join!(a.dispatch(reaction(1)), b.dispatch(reaction(1)));

        assert!(!registry.contains(MessageId(100)));
        // After the first exhaustion is claimed no further handling occurs;
        // subsequent dispatches are misses.
        registry.dispatch(reaction(1)).await;
        let total = fires.load(Ordering::SeqCst);
        assert!(total <= 2, "handler fired {total} times");
    }

    #[tokio::test]
    async fn replacement_survives_stale_exhaustion() {
        let registry = CallbackRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.register(MessageId(100), callback(&first, true));
        // Replace before any reaction arrives: only the second may fire.
        registry.register(MessageId(100), callback(&second, false));

        registry.dispatch(reaction(1)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(registry.contains(MessageId(100)));
    }
}
