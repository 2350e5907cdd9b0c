//! Error types and result alias for the crate.
//!
//! Operational "cannot operate" states (an unconfigured space, an empty
//! removal target) are signalled by empty results or [None], never by an
//! error. [`enum@crate::error::Error`] only covers configuration validation.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
