//! Error types for the data provider.

use crate::transport::TransportError;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while running an operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The operation kind is unknown, or cannot be translated into a single
    /// request.
    #[error("unsupported data provider request type {0}")]
    UnsupportedOperation(String),

    /// The HTTP call failed. Carried through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reading an attachment's file content failed.
    #[error("failed to read attachment in field '{field}': {source}")]
    AttachmentRead {
        field: String,
        #[source]
        source: std::io::Error,
    },

    /// The params did not match the shape the operation kind requires.
    #[error("invalid params: {0}")]
    InvalidParams(serde_json::Error),

    /// The API answered with a body that lacks the envelope or identity
    /// fields the translation relies on.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Serializing a request body failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<evebridge_types::Error> for ProviderError {
    fn from(error: evebridge_types::Error) -> Self {
        match error {
            evebridge_types::Error::UnknownOperation(kind) => Self::UnsupportedOperation(kind),
            evebridge_types::Error::InvalidParams(source) => Self::InvalidParams(source),
        }
    }
}
