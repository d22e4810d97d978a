use thiserror::Error;

/// Errors from [`crate::blob::BlobStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BlobError {
    /// An object already exists at the key and overwriting was disabled.
    #[error("an object already exists at {path}")]
    AlreadyExists {
        /// Key that collided.
        path: String,
    },
    /// The path cannot be turned into a public URL.
    #[error("invalid object path {path:?}")]
    InvalidPath {
        /// Offending path.
        path: String,
    },
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
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
    #[error("failed to parse storage response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}
