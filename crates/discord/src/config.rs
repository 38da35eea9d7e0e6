use {
    palaver_interactions::{Emoji, NavControls},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Configuration for a single Discord bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordAccountConfig {
    /// Bot token from the Discord developer portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Prefix that marks a message as a command invocation.
    pub command_prefix: String,

    /// Default deadline for interactive waits, in seconds.
    pub wait_timeout_secs: u64,

    /// How long timed replies stay visible before deletion, in seconds.
    pub delete_delay_secs: u64,

    /// Overrides for the pager navigation emoji.
    pub nav_emoji: NavEmojiOverrides,
}

/// Optional per-account replacements for the pager navigation emoji. Unset
/// fields keep the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavEmojiOverrides {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
    pub stop: Option<String>,
}

impl NavEmojiOverrides {
    /// Merge the overrides into the default control set.
    #[must_use]
    pub fn controls(&self) -> NavControls {
        let mut controls = NavControls::default();
        if let Some(glyph) = &self.first {
            controls.first = Emoji::unicode(glyph);
        }
        if let Some(glyph) = &self.previous {
            controls.previous = Emoji::unicode(glyph);
        }
        if let Some(glyph) = &self.next {
            controls.next = Emoji::unicode(glyph);
        }
        if let Some(glyph) = &self.last {
            controls.last = Emoji::unicode(glyph);
        }
        if let Some(glyph) = &self.stop {
            controls.stop = Emoji::unicode(glyph);
        }
        controls
    }
}

impl std::fmt::Debug for DiscordAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordAccountConfig")
            .field("token", &"[REDACTED]")
            .field("command_prefix", &self.command_prefix)
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for DiscordAccountConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            command_prefix: "!".to_owned(),
            wait_timeout_secs: 15,
            delete_delay_secs: 5,
            nav_emoji: NavEmojiOverrides::default(),
        }
    }
}
