pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while establishing or tearing down a Discord connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("discord bot token is not configured")]
    MissingToken,

    #[error("discord client error: {0}")]
    Client(#[from] serenity::Error),
}
