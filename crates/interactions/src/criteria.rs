//! Composable asynchronous predicates.
//!
//! A [`Criterion`] decides whether an observed event belongs to a given
//! invocation. Criteria are stateless and reusable: the same instance may
//! gate any number of concurrent waits or callbacks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::event::{Invocation, MessageEvent, ReactionEvent};

/// Asynchronous predicate over (invocation, event). Implementations may
/// perform async lookups but must not hold engine state.
#[async_trait]
pub trait Criterion<E>: Send + Sync {
    async fn judge(&self, invocation: &Invocation, event: &E) -> bool;
}

/// Ordered AND-composite of criteria. Members are evaluated in registration
/// order; the first false member short-circuits the rest.
pub struct Criteria<E> {
    members: Vec<Arc<dyn Criterion<E>>>,
}

impl<E> Default for Criteria<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Criteria<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Append a member. Only used while assembling; the composite is not
    /// mutated once judging begins.
    pub fn add(&mut self, criterion: impl Criterion<E> + 'static) {
        self.members.push(Arc::new(criterion));
    }

    /// Builder form of [`Criteria::add`].
    #[must_use]
    pub fn with(mut self, criterion: impl Criterion<E> + 'static) -> Self {
        self.add(criterion);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl<E: Sync> Criterion<E> for Criteria<E> {
    async fn judge(&self, invocation: &Invocation, event: &E) -> bool {
        for member in &self.members {
            if !member.judge(invocation, event).await {
                return false;
            }
        }
        true
    }
}

/// Matches messages authored by the invocation's requester.
pub struct FromRequester;

#[async_trait]
impl Criterion<MessageEvent> for FromRequester {
    async fn judge(&self, invocation: &Invocation, event: &MessageEvent) -> bool {
        event.author == invocation.user
    }
}

/// Matches messages sent in the invocation's channel.
pub struct InSourceChannel;

#[async_trait]
impl Criterion<MessageEvent> for InSourceChannel {
    async fn judge(&self, invocation: &Invocation, event: &MessageEvent) -> bool {
        event.channel == invocation.channel
    }
}

/// Matches reactions added by the invocation's requester.
pub struct ReactionFromRequester;

#[async_trait]
impl Criterion<ReactionEvent> for ReactionFromRequester {
    async fn judge(&self, invocation: &Invocation, event: &ReactionEvent) -> bool {
        event.user == invocation.user
    }
}

/// Adapter for ad hoc predicates expressed as plain closures.
pub struct FnCriterion<F> {
    f: F,
}

/// Wrap a closure as a [`Criterion`].
pub fn criterion_fn<F>(f: F) -> FnCriterion<F> {
    FnCriterion { f }
}

#[async_trait]
impl<E, F> Criterion<E> for FnCriterion<F>
where
    E: Sync,
    F: Fn(&Invocation, &E) -> bool + Send + Sync,
{
    async fn judge(&self, invocation: &Invocation, event: &E) -> bool {
        (self.f)(invocation, event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::event::{ChannelId, MessageId, UserId};

    fn invocation() -> Invocation {
        Invocation {
            user: UserId(1),
            channel: ChannelId(10),
            message: MessageId(100),
            guild: None,
        }
    }

    fn message(author: u64, channel: u64) -> MessageEvent {
        MessageEvent {
            id: MessageId(7),
            channel: ChannelId(channel),
            author: UserId(author),
            author_is_bot: false,
            content: "hi".into(),
        }
    }

    struct Recording {
        evaluated: Arc<AtomicBool>,
        verdict: bool,
    }

    #[async_trait]
    impl Criterion<MessageEvent> for Recording {
        async fn judge(&self, _invocation: &Invocation, _event: &MessageEvent) -> bool {
            self.evaluated.store(true, Ordering::SeqCst);
            self.verdict
        }
    }

    #[tokio::test]
    async fn empty_composite_accepts() {
        let criteria = Criteria::<MessageEvent>::new();
        assert!(criteria.judge(&invocation(), &message(1, 10)).await);
    }

    #[tokio::test]
    async fn composite_is_logical_and() {
        let criteria = Criteria::new().with(FromRequester).with(InSourceChannel);
        assert!(criteria.judge(&invocation(), &message(1, 10)).await);
        assert!(!criteria.judge(&invocation(), &message(2, 10)).await);
        assert!(!criteria.judge(&invocation(), &message(1, 11)).await);
    }

    #[tokio::test]
    async fn composite_short_circuits_after_first_false() {
        let evaluated = Arc::new(AtomicBool::new(false));
        let criteria = Criteria::new().with(FromRequester).with(Recording {
            evaluated: Arc::clone(&evaluated),
            verdict: true,
        });

        // First member rejects; the recorder must never run.
        assert!(!criteria.judge(&invocation(), &message(2, 10)).await);
        assert!(!evaluated.load(Ordering::SeqCst));

        assert!(criteria.judge(&invocation(), &message(1, 10)).await);
        assert!(evaluated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn closure_criterion() {
        let wants_ping = criterion_fn(|_inv: &Invocation, event: &MessageEvent| {
            event.content.starts_with("ping")
        });
        let mut event = message(1, 10);
        event.content = "ping pong".into();
        assert!(wants_ping.judge(&invocation(), &event).await);
        event.content = "pong".into();
        assert!(!wants_ping.judge(&invocation(), &event).await);
    }

    #[tokio::test]
    async fn reaction_from_requester() {
        let event = ReactionEvent {
            message: MessageId(100),
            channel: ChannelId(10),
            user: UserId(1),
            emoji: crate::event::Emoji::unicode("👍"),
        };
        assert!(ReactionFromRequester.judge(&invocation(), &event).await);

        let other = ReactionEvent {
            user: UserId(9),
            ..event
        };
        assert!(!ReactionFromRequester.judge(&invocation(), &other).await);
    }
}
