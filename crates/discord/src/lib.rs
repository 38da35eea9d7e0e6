//! Discord adapter for the interaction engine.
//!
//! Connects to the gateway with serenity, translates events into the
//! engine's model, and implements the outbound [`Messenger`] boundary over
//! the Discord HTTP API.
//!
//! [`Messenger`]: palaver_interactions::Messenger

pub mod config;
pub mod connection;
mod convert;
mod error;
pub mod handler;
pub mod messenger;

pub use crate::{
    config::{DiscordAccountConfig, NavEmojiOverrides},
    connection::Connection,
    error::{Error, Result},
    handler::EngineBridge,
    messenger::SerenityMessenger,
};
