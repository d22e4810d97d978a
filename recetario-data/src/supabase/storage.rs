//! [`BlobStore`] over the Supabase storage API.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use recetario_core::{BlobError, BlobStore, UploadOptions};

use super::client::SupabaseClient;

/// Body returned by a successful upload.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    /// Bucket-qualified object key.
    #[serde(rename = "Key")]
    pub key: String,
}

/// Error body returned by the storage API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StorageErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

/// Photo bucket in Supabase storage.
#[derive(Debug, Clone)]
pub struct StorageBucket {
    client: SupabaseClient,
}

impl StorageBucket {
    /// Use the bucket configured on `client`.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn bucket(&self) -> &str {
        self.client.config().bucket.as_str()
    }

    fn object_url(&self, path: &str) -> Url {
        let mut segments = vec!["storage", "v1", "object", self.bucket()];
        segments.extend(path.split('/'));
        self.client.endpoint(&segments)
    }

    fn upload_request(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> (Url, RequestBuilder) {
        let url = self.object_url(key);
        let request = self
            .client
            .http()
            .post(url.clone())
            .header(CONTENT_TYPE, options.content_type.as_str())
            .header(
                CACHE_CONTROL,
                format!("max-age={}", options.cache_control_secs),
            )
            .header("x-upsert", options.overwrite.to_string())
            .body(bytes);
        (url, request)
    }

    fn remove_request(&self, path: &str) -> Result<(Url, RequestBuilder), BlobError> {
        let url = self
            .client
            .endpoint(&["storage", "v1", "object", self.bucket()]);
        let body = serde_json::to_vec(&RemoveRequest { prefixes: [path] }).map_err(|err| {
            BlobError::Parse {
                message: err.to_string(),
            }
        })?;
        let request = self
            .client
            .http()
            .delete(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Ok((url, request))
    }
}

fn validate_path(path: &str) -> Result<(), BlobError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(BlobError::InvalidPath {
            path: path.to_owned(),
        });
    }
    Ok(())
}

async fn check_status(response: Response, url: &Url, path: &str) -> Result<Response, BlobError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(url.as_str(), status, &body, path))
}

/// Path of an object the storage API accepted, whatever the response body says.
pub(crate) fn confirm_upload(key: &str, body: &str) -> String {
    match serde_json::from_str::<UploadResponse>(body) {
        Ok(uploaded) => log::debug!("stored object {}", uploaded.key),
        Err(err) => log::debug!("stored {key}; upload response not understood: {err}"),
    }
    key.to_owned()
}

/// Map a non-success response onto a [`BlobError`].
pub(crate) fn classify_failure(url: &str, status: StatusCode, body: &str, path: &str) -> BlobError {
    let parsed: StorageErrorBody = serde_json::from_str(body).unwrap_or_default();
    if status == StatusCode::CONFLICT || parsed.error == "Duplicate" {
        return BlobError::AlreadyExists {
            path: path.to_owned(),
        };
    }
    let message = if !parsed.message.is_empty() {
        parsed.message
    } else if !body.trim().is_empty() {
        body.trim().to_owned()
    } else {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    };
    BlobError::Http {
        url: url.to_owned(),
        status: status.as_u16(),
        message,
    }
}

#[async_trait(?Send)]
impl BlobStore for StorageBucket {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, BlobError> {
        validate_path(key)?;
        let (url, request) = self.upload_request(key, bytes, options);
        log::debug!("uploading {key} to {url}");
        let response = self.client.send(request, &url).await?;
        let response = check_status(response, &url, key).await?;
        // The object exists once the status is a success; the body is advisory.
        match response.text().await {
            Ok(body) => Ok(confirm_upload(key, &body)),
            Err(err) => {
                log::debug!("stored {key}; upload response unreadable: {err}");
                Ok(key.to_owned())
            }
        }
    }

    fn public_url(&self, path: &str) -> Result<String, BlobError> {
        validate_path(path)?;
        let mut segments = vec!["storage", "v1", "object", "public", self.bucket()];
        segments.extend(path.split('/'));
        Ok(self.client.endpoint(&segments).into())
    }

    async fn remove(&self, path: &str) -> Result<(), BlobError> {
        validate_path(path)?;
        let (url, request) = self.remove_request(path)?;
        let response = self.client.send(request, &url).await?;
        check_status(response, &url, path).await?;
        Ok(())
    }
}
