//! Platform-agnostic interactive message engine.
//!
//! Builds conversational flows on top of a chat gateway: one-shot waits for
//! a follow-up message, reaction-driven callbacks on sent messages, a pager,
//! and inline per-emoji actions. The platform adapter feeds events in through
//! [`Interactions`] and provides a [`Messenger`] for outbound effects.

pub mod command;
pub mod context;
pub mod criteria;
pub mod engine;
mod error;
pub mod event;
pub mod inline;
pub mod messenger;
pub mod paginator;
pub mod registry;
mod waiter;

pub use crate::{
    command::{
        AccessLevel, AccessResolver, CommandHandler, CommandSet, CommandSpec, Dispatch,
        FixedAccess, Precondition, RequireGuild, Verdict,
    },
    context::{DEFAULT_DELETE_DELAY, InteractionContext},
    criteria::{
        Criteria, Criterion, FnCriterion, FromRequester, InSourceChannel, ReactionFromRequester,
        criterion_fn,
    },
    engine::{DEFAULT_WAIT_TIMEOUT, Interactions},
    error::{Error, Result},
    event::{
        ChannelId, Emoji, GuildId, Invocation, MessageEvent, MessageId, ReactionEvent, UserId,
    },
    inline::{ActionReply, FnAction, InlineAction, action_fn},
    messenger::{Embed, Messenger, OutboundMessage, SentMessage},
    paginator::{Nav, NavControls, Page, PagerOptions, PaginatedReply},
    registry::{ReactionCallback, ReactionHandler, RunMode},
};
