//! [`ResourceLoader`] for photos picked on the local device.
//!
//! Locators are either bare filesystem paths, `file://` URIs or
//! `http(s)://` URLs. Files are read through `recetario-fs` on Tokio's
//! blocking pool; URLs are fetched with `reqwest`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use reqwest::{Client, StatusCode};
use url::Url;

use recetario_core::{ResourceError, ResourceLoader};

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Locator {
    File(Utf8PathBuf),
    Remote(Url),
}

/// Loads image bytes from local files and remote URLs.
#[derive(Debug, Clone, Default)]
pub struct LocalResourceLoader {
    client: Client,
}

impl LocalResourceLoader {
    /// Create a loader with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that fetches URLs with `client`.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_file(uri: &str, path: Utf8PathBuf) -> Result<Vec<u8>, ResourceError> {
        let read = tokio::task::spawn_blocking(move || recetario_fs::read_file_bytes(&path))
            .await
            .map_err(|err| ResourceError::Read {
                uri: uri.to_owned(),
                message: err.to_string(),
            })?;
        read.map_err(|err| convert_io_error(&err, uri))
    }

    async fn fetch(&self, uri: &str, url: Url) -> Result<Vec<u8>, ResourceError> {
        let fetch_error = |err: reqwest::Error| ResourceError::Fetch {
            uri: uri.to_owned(),
            message: err.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound {
                uri: uri.to_owned(),
            });
        }
        let response = response.error_for_status().map_err(fetch_error)?;
        let bytes = response.bytes().await.map_err(fetch_error)?;
        Ok(bytes.to_vec())
    }
}

fn parse_locator(uri: &str) -> Result<Locator, ResourceError> {
    let unsupported = || ResourceError::UnsupportedScheme {
        uri: uri.to_owned(),
    };
    match Url::parse(uri) {
        // A one-letter scheme is a Windows drive letter, not a URL.
        Ok(url) if url.scheme().len() > 1 => match url.scheme() {
            "http" | "https" => Ok(Locator::Remote(url)),
            "file" => {
                let path = url.to_file_path().map_err(|()| unsupported())?;
                utf8_path(uri, path).map(Locator::File)
            }
            _ => Err(unsupported()),
        },
        _ => Ok(Locator::File(Utf8PathBuf::from(uri))),
    }
}

fn utf8_path(uri: &str, path: PathBuf) -> Result<Utf8PathBuf, ResourceError> {
    Utf8PathBuf::from_path_buf(path).map_err(|path| ResourceError::Read {
        uri: uri.to_owned(),
        message: format!("path {} is not valid UTF-8", path.display()),
    })
}

fn convert_io_error(error: &io::Error, uri: &str) -> ResourceError {
    if error.kind() == io::ErrorKind::NotFound {
        return ResourceError::NotFound {
            uri: uri.to_owned(),
        };
    }
    ResourceError::Read {
        uri: uri.to_owned(),
        message: error.to_string(),
    }
}

#[async_trait(?Send)]
impl ResourceLoader for LocalResourceLoader {
    async fn load(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
        match parse_locator(uri.trim())? {
            Locator::File(path) => Self::read_file(uri, path).await,
            Locator::Remote(url) => self.fetch(uri, url).await,
        }
    }
}
