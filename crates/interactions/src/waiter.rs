//! Pending-wait roster for the message waiter.
//!
//! Each `wait_for_message` call owns one subscription here. Delivery spawns
//! independent work per subscription so one slow criterion cannot delay the
//! rest, and the result slot is single-assignment: whichever of the matching
//! event or the timeout fires first wins, the loser is a no-op.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use {dashmap::DashMap, tokio::sync::oneshot, tracing::trace};

use crate::{
    criteria::Criterion,
    event::{Invocation, MessageEvent},
};

/// Subscription handle for one pending wait.
pub(crate) type WaitToken = u64;

/// Removes the subscription when dropped, so a cancelled wait (aborted task,
/// losing `select!` arm) cannot leave a roster entry behind.
pub(crate) struct WaitGuard {
    roster: WaitRoster,
    token: WaitToken,
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        self.roster.unsubscribe(self.token);
    }
}

struct PendingWait {
    invocation: Invocation,
    criterion: Arc<dyn Criterion<MessageEvent>>,
    /// One-shot result slot; `take` enforces single assignment, so a second
    /// resolve attempt finds the slot empty and does nothing.
    slot: Mutex<Option<oneshot::Sender<MessageEvent>>>,
}

impl PendingWait {
    fn resolve(&self, event: MessageEvent) {
        let sender = self.slot.lock().ok().and_then(|mut slot| slot.take());
        if let Some(sender) = sender {
            // The receiver may already have been dropped on timeout.
            let _ = sender.send(event);
        }
    }
}

#[derive(Clone)]
pub(crate) struct WaitRoster {
    next_token: Arc<AtomicU64>,
    waits: Arc<DashMap<WaitToken, Arc<PendingWait>>>,
}

impl WaitRoster {
    pub(crate) fn new() -> Self {
        Self {
            next_token: Arc::new(AtomicU64::new(0)),
            waits: Arc::new(DashMap::new()),
        }
    }

    /// Install a new subscription. The wait is visible to delivery as soon as
    /// this returns; dropping the guard removes it again.
    pub(crate) fn subscribe(
        &self,
        invocation: Invocation,
        criterion: Arc<dyn Criterion<MessageEvent>>,
    ) -> (WaitGuard, oneshot::Receiver<MessageEvent>) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.waits.insert(token, Arc::new(PendingWait {
            invocation,
            criterion,
            slot: Mutex::new(Some(tx)),
        }));
        let guard = WaitGuard {
            roster: self.clone(),
            token,
        };
        (guard, rx)
    }

    /// Remove a subscription. Idempotent.
    fn unsubscribe(&self, token: WaitToken) {
        self.waits.remove(&token);
    }

    /// Number of outstanding subscriptions.
    pub(crate) fn pending(&self) -> usize {
        self.waits.len()
    }

    pub(crate) fn clear(&self) {
        self.waits.clear();
    }

    /// Hand an inbound message to every subscription. Criterion evaluation is
    /// spawned per wait; waits judge and resolve independently.
    pub(crate) fn deliver(&self, event: &MessageEvent) {
        for entry in self.waits.iter() {
            let wait = Arc::clone(entry.value());
            let event = event.clone();
            tokio::spawn(async move {
                if wait.criterion.judge(&wait.invocation, &event).await {
                    trace!(message = %event.id, "pending wait matched");
                    wait.resolve(event);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        criteria::{Criteria, FromRequester},
        event::{ChannelId, MessageId, UserId},
    };

    fn invocation(user: u64) -> Invocation {
        Invocation {
            user: UserId(user),
            channel: ChannelId(10),
            message: MessageId(100),
            guild: None,
        }
    }

    fn message(author: u64) -> MessageEvent {
        MessageEvent {
            id: MessageId(7),
            channel: ChannelId(10),
            author: UserId(author),
            author_is_bot: false,
            content: "follow-up".into(),
        }
    }

    #[tokio::test]
    async fn delivery_resolves_matching_wait() {
        let roster = WaitRoster::new();
        let criterion = Arc::new(Criteria::new().with(FromRequester));
        let (guard, rx) = roster.subscribe(invocation(1), criterion);
        assert_eq!(roster.pending(), 1);

        roster.deliver(&message(1));
        let resolved = rx.await.ok();
        assert_eq!(resolved.map(|m| m.author), Some(UserId(1)));

        drop(guard);
        assert_eq!(roster.pending(), 0);
    }

    #[tokio::test]
    async fn non_matching_message_leaves_wait_pending() {
        let roster = WaitRoster::new();
        let criterion = Arc::new(Criteria::new().with(FromRequester));
        let (_guard, mut rx) = roster.subscribe(invocation(1), criterion);

        roster.deliver(&message(2));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(roster.pending(), 1);
    }

    #[tokio::test]
    async fn resolve_is_single_assignment() {
        let roster = WaitRoster::new();
        let criterion = Arc::new(Criteria::<MessageEvent>::new());
        let (_guard, rx) = roster.subscribe(invocation(1), criterion);

        // Two matching deliveries race; exactly one resolves the slot.
        roster.deliver(&message(1));
        roster.deliver(&message(1));
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn dropping_the_guard_releases_the_subscription() {
        let roster = WaitRoster::new();
        let criterion = Arc::new(Criteria::<MessageEvent>::new());
        let (guard, rx) = roster.subscribe(invocation(1), criterion);
        assert_eq!(roster.pending(), 1);

        // Receiver dropped first, as when the wait future is cancelled.
        drop(rx);
        drop(guard);
        assert_eq!(roster.pending(), 0);
    }
}
