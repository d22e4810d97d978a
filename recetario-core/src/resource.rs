//! Loading local resources (picked photos) into memory.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from [`ResourceLoader::load`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResourceError {
    /// Nothing exists at the locator.
    #[error("resource {uri} does not exist")]
    NotFound {
        /// Locator that was requested.
        uri: String,
    },
    /// The resource exists but could not be read.
    #[error("failed to read resource {uri}: {message}")]
    Read {
        /// Locator that was requested.
        uri: String,
        /// Underlying I/O error description.
        message: String,
    },
    /// Fetching a remote locator failed.
    #[error("failed to fetch resource {uri}: {message}")]
    Fetch {
        /// Locator that was requested.
        uri: String,
        /// Transport error description.
        message: String,
    },
    /// The locator scheme is not supported by the loader.
    #[error("unsupported resource locator {uri}")]
    UnsupportedScheme {
        /// Locator that was requested.
        uri: String,
    },
}

/// Reads the bytes behind a local resource locator.
#[async_trait(?Send)]
pub trait ResourceLoader {
    /// Load the full contents of `uri`.
    async fn load(&self, uri: &str) -> Result<Vec<u8>, ResourceError>;
}
