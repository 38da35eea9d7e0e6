//! Discord connection lifecycle.

use std::{sync::Arc, time::Duration};

use {
    secrecy::ExposeSecret,
    serenity::{Client, all::ShardManager},
    tracing::{error, info},
};

use palaver_interactions::{InteractionContext, Interactions, Invocation, Messenger};

use crate::{
    config::DiscordAccountConfig,
    error::{Error, Result},
    handler::EngineBridge,
    messenger::SerenityMessenger,
};

/// A live gateway connection with its interaction engine.
pub struct Connection {
    engine: Arc<Interactions>,
    messenger: Arc<SerenityMessenger>,
    shard_manager: Arc<ShardManager>,
}

impl Connection {
    /// Connect to the gateway and start processing events in the background.
    pub async fn connect(config: &DiscordAccountConfig) -> Result<Self> {
        if config.token.expose_secret().is_empty() {
            return Err(Error::MissingToken);
        }

        let engine = Arc::new(Interactions::new(Duration::from_secs(
            config.wait_timeout_secs,
        )));
        let handler = EngineBridge {
            engine: Arc::clone(&engine),
        };

        let client = Client::builder(config.token.expose_secret(), EngineBridge::intents())
            .event_handler(handler)
            .await?;
        let http = Arc::clone(&client.http);
        let shard_manager = Arc::clone(&client.shard_manager);

        tokio::spawn(async move {
            let mut client = client;
            if let Err(e) = client.start().await {
                error!(error = %e, "discord client stopped");
            }
        });
        info!("discord connection started");

        Ok(Self {
            engine,
            messenger: Arc::new(SerenityMessenger::new(http)),
            shard_manager,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Interactions> {
        &self.engine
    }

    #[must_use]
    pub fn messenger(&self) -> Arc<dyn Messenger> {
        Arc::clone(&self.messenger) as Arc<dyn Messenger>
    }

    /// Build the per-invocation interaction surface for a command.
    #[must_use]
    pub fn context(&self, invocation: Invocation) -> InteractionContext {
        InteractionContext::new(self.messenger(), Arc::clone(&self.engine), invocation)
    }

    /// Disconnect every shard and drop all pending interaction state.
    pub async fn shutdown(&self) {
        self.shard_manager.shutdown_all().await;
        self.engine.shutdown();
        info!("discord connection shut down");
    }
}
