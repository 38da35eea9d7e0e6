//! Reaction-driven pager.
//!
//! A pager presents an ordered page sequence on a single message and
//! navigates it via reactions. Navigation is an explicit transition table
//! ([`NavControls::action_for`] + [`Nav::apply`]) so clamping and the stop
//! transition are testable without any I/O.

use std::sync::{Arc, Mutex};

use {async_trait::async_trait, tracing::warn};

use crate::{
    event::{Emoji, ReactionEvent},
    messenger::{Embed, Messenger, OutboundMessage, SentMessage},
    registry::ReactionHandler,
};

/// One page of a pager.
#[derive(Debug, Clone)]
pub struct Page {
    /// Optional title fragment appended to the pager title.
    pub title: Option<String>,
    pub body: String,
    /// Optional image URL shown with the page.
    pub image: Option<String>,
}

impl Page {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }
}

/// A page sequence ready to display. Pages are fixed at construction.
#[derive(Debug, Clone)]
pub struct PaginatedReply {
    pub title: String,
    pub color: u32,
    pub pages: Vec<Page>,
}

impl PaginatedReply {
    pub const DEFAULT_COLOR: u32 = 0x7289DA;

    #[must_use]
    pub fn new(title: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            title: title.into(),
            color: Self::DEFAULT_COLOR,
            pages,
        }
    }

    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// Navigation input, decoded from a reaction emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    First,
    Previous,
    Next,
    Last,
    Stop,
}

impl Nav {
    /// Transition function over the page index. `None` is the terminal stop
    /// transition; every other input clamps to `[0, len-1]`.
    #[must_use]
    pub fn apply(self, index: usize, len: usize) -> Option<usize> {
        let max = len.saturating_sub(1);
        match self {
            Self::First => Some(0),
            Self::Previous => Some(index.saturating_sub(1)),
            Self::Next => Some((index + 1).min(max)),
            Self::Last => Some(max),
            Self::Stop => None,
        }
    }
}

/// The reaction emoji driving each navigation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavControls {
    pub first: Emoji,
    pub previous: Emoji,
    pub next: Emoji,
    pub last: Emoji,
    pub stop: Emoji,
}

impl Default for NavControls {
    fn default() -> Self {
        Self {
            first: Emoji::unicode("⏮️"),
            previous: Emoji::unicode("◀️"),
            next: Emoji::unicode("▶️"),
            last: Emoji::unicode("⏭️"),
            stop: Emoji::unicode("⏹️"),
        }
    }
}

impl NavControls {
    /// Decode a reaction emoji into a navigation input.
    #[must_use]
    pub fn action_for(&self, emoji: &Emoji) -> Option<Nav> {
        if *emoji == self.first {
            Some(Nav::First)
        } else if *emoji == self.previous {
            Some(Nav::Previous)
        } else if *emoji == self.next {
            Some(Nav::Next)
        } else if *emoji == self.last {
            Some(Nav::Last)
        } else if *emoji == self.stop {
            Some(Nav::Stop)
        } else {
            None
        }
    }

    /// Display order for attaching the navigation reactions.
    #[must_use]
    pub fn in_order(&self) -> [&Emoji; 5] {
        [&self.first, &self.previous, &self.next, &self.last, &self.stop]
    }
}

/// Display options, fixed at construction. `show_all` and `show_index`
/// affect rendering only, never the transition logic.
#[derive(Debug, Clone)]
pub struct PagerOptions {
    /// Render every page body in one embed instead of the current page.
    pub show_all: bool,
    /// Append a "Page i/n" footer.
    pub show_index: bool,
    /// Only the invoking user may navigate.
    pub from_requester_only: bool,
    pub run_mode: crate::registry::RunMode,
    pub controls: NavControls,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            show_all: false,
            show_index: false,
            from_requester_only: true,
            run_mode: crate::registry::RunMode::default(),
            controls: NavControls::default(),
        }
    }
}

/// Render the pager at an index. Pure; exercised directly by tests.
#[must_use]
pub(crate) fn render(reply: &PaginatedReply, index: usize, options: &PagerOptions) -> OutboundMessage {
    let len = reply.pages.len();
    let mut embed = Embed {
        title: Some(reply.title.clone()),
        color: Some(reply.color),
        ..Embed::default()
    };

    if options.show_all {
        let mut description = String::new();
        for (i, page) in reply.pages.iter().enumerate() {
            if i > 0 {
                description.push_str("\n\n");
            }
            description.push_str(&format!("**{}.** {}", i + 1, page.body));
        }
        embed.description = Some(description);
    } else if let Some(page) = reply.pages.get(index) {
        if let Some(fragment) = &page.title {
            embed.title = Some(format!("{} | {}", reply.title, fragment));
        }
        embed.description = Some(page.body.clone());
        embed.image = page.image.clone();
    }

    if options.show_index {
        embed.footer = Some(format!("Page {}/{}", index + 1, len));
    }

    OutboundMessage::embed(embed)
}

/// The registered callback backing a live pager.
pub(crate) struct PagerCallback {
    messenger: Arc<dyn Messenger>,
    reply: PaginatedReply,
    options: PagerOptions,
    message: SentMessage,
    index: Mutex<usize>,
}

impl PagerCallback {
    pub(crate) fn new(
        messenger: Arc<dyn Messenger>,
        reply: PaginatedReply,
        options: PagerOptions,
        message: SentMessage,
    ) -> Self {
        Self {
            messenger,
            reply,
            options,
            message,
            index: Mutex::new(0),
        }
    }

    /// Downstream failures surface as a notice in the owning channel and are
    /// never escalated into an engine fault.
    async fn notice(&self, text: &str) {
        let send = self
            .messenger
            .send_message(self.message.channel, OutboundMessage::text(text))
            .await;
        if let Err(e) = send {
            warn!(error = %e, channel = %self.message.channel, "failed to send pager notice");
        }
    }

    fn current(&self) -> usize {
        self.index.lock().map(|guard| *guard).unwrap_or(0)
    }

    fn set_current(&self, index: usize) {
        if let Ok(mut guard) = self.index.lock() {
            *guard = index;
        }
    }
}

#[async_trait]
impl ReactionHandler for PagerCallback {
    async fn handle(&self, reaction: &ReactionEvent) -> bool {
        let Some(nav) = self.options.controls.action_for(&reaction.emoji) else {
            return false;
        };

        let current = self.current();
        match nav.apply(current, self.reply.pages.len()) {
            None => {
                // Stop: best-effort cleanup of the navigation reactions.
                let cleared = self
                    .messenger
                    .remove_all_reactions(self.message.channel, self.message.id)
                    .await;
                if let Err(e) = cleared {
                    warn!(error = %e, message = %self.message.id, "failed to clear pager reactions");
                    self.notice("Stopped, but the navigation reactions could not be removed.")
                        .await;
                }
                true
            },
            Some(next) => {
                if next != current {
                    self.set_current(next);
                    let body = render(&self.reply, next, &self.options);
                    let edited = self
                        .messenger
                        .edit_message(self.message.channel, self.message.id, body)
                        .await;
                    if let Err(e) = edited {
                        warn!(error = %e, message = %self.message.id, "failed to update pager page");
                        self.notice("Could not update the page.").await;
                    }
                }
                false
            },
        }
    }
}
