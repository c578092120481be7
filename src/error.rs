use std::error::Error as StdError;

use thiserror::Error;

/// Earshot's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Earshot's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// The payload length is not a whole number of `f32` samples.
    #[error("buffer size must be a multiple of element size (got {len} bytes)")]
    MisalignedPayload { len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_context_chain_is_preserved() {
        let err = anyhow::anyhow!("inner").context("outer");
        let err: Error = err.into();
        assert_eq!(err.to_string(), "outer: inner");
    }

    #[test]
    fn misaligned_payload_reports_length() {
        let err = Error::MisalignedPayload { len: 7 };
        assert!(err.to_string().contains("7 bytes"));
    }
}
