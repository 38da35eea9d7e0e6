//! Engine-owned event model.
//!
//! The engine never touches platform SDK types directly; the adapter converts
//! gateway payloads into these before dispatch.

use std::fmt;

/// Opaque message identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Opaque channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Opaque user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Opaque guild identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Emoji identity, either a unicode glyph or a platform custom emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emoji {
    Unicode(String),
    Custom { id: u64, name: Option<String> },
}

impl Emoji {
    #[must_use]
    pub fn unicode(glyph: impl Into<String>) -> Self {
        Self::Unicode(glyph.into())
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(glyph) => f.write_str(glyph),
            Self::Custom { id, name } => match name {
                Some(name) => write!(f, "{name}:{id}"),
                None => write!(f, "custom:{id}"),
            },
        }
    }
}

/// An inbound chat message observed on the shared event stream.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub id: MessageId,
    pub channel: ChannelId,
    pub author: UserId,
    pub author_is_bot: bool,
    pub content: String,
}

/// An emoji reaction added to a message.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub message: MessageId,
    pub channel: ChannelId,
    pub user: UserId,
    pub emoji: Emoji,
}

/// The command invocation an interaction belongs to: who asked, where, and
/// with which message. Criteria are judged against this.
#[derive(Debug, Clone, Copy)]
pub struct Invocation {
    pub user: UserId,
    pub channel: ChannelId,
    pub message: MessageId,
    pub guild: Option<GuildId>,
}
