//! Command descriptors and dispatch.
//!
//! A [`CommandSet`] maps lowercase command names to handlers, gated by an
//! access level and optional preconditions. Denials are surfaced to the
//! invoking user rather than swallowed.

use std::{collections::HashMap, fmt, sync::Arc};

use {
    async_trait::async_trait,
    tracing::{debug, warn},
};

use crate::{Result, context::InteractionContext, event::Invocation};

/// Ordered access tiers. Comparison follows declaration order, so
/// `Moderator < Admin` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    #[default]
    Everyone,
    Moderator,
    Admin,
    ServerOwner,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Everyone => "everyone",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::ServerOwner => "server owner",
        };
        f.write_str(name)
    }
}

/// Resolves the access tier a user holds for an invocation.
#[async_trait]
pub trait AccessResolver: Send + Sync {
    async fn access_level(&self, invocation: &Invocation) -> AccessLevel;
}

/// Grants every user a fixed tier. Useful as a default and in tests.
pub struct FixedAccess(pub AccessLevel);

#[async_trait]
impl AccessResolver for FixedAccess {
    async fn access_level(&self, _invocation: &Invocation) -> AccessLevel {
        self.0
    }
}

/// Outcome of a precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

/// A gate evaluated before a command handler runs.
#[async_trait]
pub trait Precondition: Send + Sync {
    async fn check(&self, invocation: &Invocation) -> Verdict;
}

/// Denies invocations that did not originate inside a guild.
pub struct RequireGuild;

#[async_trait]
impl Precondition for RequireGuild {
    async fn check(&self, invocation: &Invocation) -> Verdict {
        if invocation.guild.is_some() {
            Verdict::Allow
        } else {
            Verdict::Deny("This command can only be used in a server.".to_owned())
        }
    }
}

/// A command's behavior.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &InteractionContext, args: &[String]) -> Result<()>;
}

/// A named command: handler plus the gates in front of it.
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub access: AccessLevel,
    pub preconditions: Vec<Arc<dyn Precondition>>,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            access: AccessLevel::default(),
            preconditions: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn precondition(mut self, precondition: impl Precondition + 'static) -> Self {
        self.preconditions.push(Arc::new(precondition));
        self
    }
}

/// Outcome of dispatching one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Completed,
    UnknownCommand,
    Denied(String),
}

/// The installed commands for a connection. Names are matched
/// case-insensitively; inserting an existing name replaces it.
pub struct CommandSet {
    commands: HashMap<String, CommandSpec>,
    resolver: Arc<dyn AccessResolver>,
}

impl CommandSet {
    #[must_use]
    pub fn new(resolver: Arc<dyn AccessResolver>) -> Self {
        Self {
            commands: HashMap::new(),
            resolver,
        }
    }

    /// Install a command. Last write wins on name collisions.
    pub fn insert(&mut self, spec: CommandSpec) {
        let key = spec.name.to_lowercase();
        if self.commands.insert(key, spec).is_some() {
            debug!("replaced existing command registration");
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(&name.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse and run one command line. Denials are reported back to the
    /// invoking user; handler errors propagate to the caller.
    pub async fn dispatch(&self, ctx: &InteractionContext, line: &str) -> Result<Dispatch> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(Dispatch::UnknownCommand);
        };
        let Some(spec) = self.get(name) else {
            return Ok(Dispatch::UnknownCommand);
        };
        let args: Vec<String> = tokens.map(str::to_owned).collect();

        let invocation = ctx.invocation();
        let held = self.resolver.access_level(&invocation).await;
        if held < spec.access {
            let reason = format!("This command requires {} access.", spec.access);
            return self.deny(ctx, reason).await;
        }

        for precondition in &spec.preconditions {
            if let Verdict::Deny(reason) = precondition.check(&invocation).await {
                return self.deny(ctx, reason).await;
            }
        }

        spec.handler.run(ctx, &args).await?;
        Ok(Dispatch::Completed)
    }

    async fn deny(&self, ctx: &InteractionContext, reason: String) -> Result<Dispatch> {
        if let Err(e) = ctx.reply(reason.clone()).await {
            warn!(error = %e, "failed to deliver command denial");
        }
        Ok(Dispatch::Denied(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChannelId, GuildId, MessageId, UserId};

    fn invocation(guild: Option<GuildId>) -> Invocation {
        Invocation {
            user: UserId(1),
            channel: ChannelId(10),
            message: MessageId(100),
            guild,
        }
    }

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(&self, _ctx: &InteractionContext, _args: &[String]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::Everyone < AccessLevel::Moderator);
        assert!(AccessLevel::Moderator < AccessLevel::Admin);
        assert!(AccessLevel::Admin < AccessLevel::ServerOwner);
    }

    #[test]
    fn insert_is_case_insensitive_last_write_wins() {
        let mut set = CommandSet::new(Arc::new(FixedAccess(AccessLevel::Everyone)));
        set.insert(CommandSpec::new("Warn", Noop).describe("first"));
        set.insert(CommandSpec::new("warn", Noop).describe("second"));

        assert_eq!(set.len(), 1);
        let spec = set.get("WARN").map(|s| s.description.as_str());
        assert_eq!(spec, Some("second"));
    }

    #[tokio::test]
    async fn require_guild_denies_direct_messages() {
        assert_eq!(
            RequireGuild.check(&invocation(Some(GuildId(5)))).await,
            Verdict::Allow
        );
        assert!(matches!(
            RequireGuild.check(&invocation(None)).await,
            Verdict::Deny(_)
        ));
    }
}
