use crate::domain::driftavbrott::Driftavbrott;
use thiserror::Error;

pub mod mock;
pub mod rest;

/// Remote lookup failed; the gate keeps whatever it already has.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("driftavbrott service timed out")]
    Timeout,
    #[error("driftavbrott service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("driftavbrott service unreachable: {0}")]
    Transport(String),
    #[error("driftavbrott service sent an unreadable window: {0}")]
    Decode(String),
}

#[async_trait::async_trait]
pub trait WindowSource: Send + Sync {
    /// At most one currently-or-soon ongoing window across the given
    /// channels. The margin (minutes) widens the interval on the remote side.
    async fn fetch_ongoing(
        &self,
        kanaler: &[String],
        system: &str,
        marginal: u32,
    ) -> Result<Option<Driftavbrott>, SourceError>;
}
