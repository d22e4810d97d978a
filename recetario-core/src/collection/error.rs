use thiserror::Error;

use crate::RecipeId;

/// Errors from [`crate::collection::RecipeCollection`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CollectionError {
    /// The remote store rejected the request (constraint violation,
    /// authorisation failure, malformed filter).
    #[error("remote collection rejected the request ({code}): {message}")]
    Rejected {
        /// Error code reported by the remote store.
        code: String,
        /// Human-readable message reported by the remote store.
        message: String,
    },
    /// No record exists with the requested identifier.
    #[error("recipe {id} does not exist")]
    NotFound {
        /// Identifier that matched no rows.
        id: RecipeId,
    },
    /// The server returned an HTTP error status without a structured body.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded the transport timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Timeout applied by the transport.
        timeout_secs: u64,
    },
    /// The response body could not be decoded.
    #[error("failed to parse collection response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}
