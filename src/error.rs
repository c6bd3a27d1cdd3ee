use std::sync::Arc;

use crate::ObjectKind;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while populating or inspecting reddit objects.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The attribute is missing even after a forced population.
    #[error("'{type_name}' has no attribute '{attribute}'")]
    AttributeLookup {
        /// Name of the object variant.
        type_name: &'static str,
        /// The attribute that was requested.
        attribute: String,
    },

    /// No endpoint with this key is configured.
    #[error("no endpoint configured for `{0}`")]
    UnknownEndpoint(String),

    /// No fullname prefix is configured for this kind of object.
    #[error("no fullname prefix configured for {0}")]
    UnknownKind(ObjectKind),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid api_url or endpoint configuration.
    #[error("invalid url configuration")]
    InvalidUrl(#[source] url::ParseError),

    /// The server returned something that can't be used to populate an object.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A snapshot was restored into a different kind of object.
    #[error("snapshot of a {found} can't be restored as a {expected}")]
    KindMismatch {
        /// Kind of the object being restored.
        expected: ObjectKind,
        /// Kind recorded in the snapshot.
        found: ObjectKind,
    },

    /// Network error.
    #[error(transparent)]
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    Network(Arc<reqwest::Error>),

    /// Error raised by a custom [`Transport`](crate::Transport).
    #[error(transparent)]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Error::InvalidUrl(value)
    }
}
