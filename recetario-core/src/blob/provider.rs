//! Blob store trait and upload options.

use async_trait::async_trait;

use super::error::BlobError;

/// Content type used for every recipe photo.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Cache lifetime, in seconds, advertised for uploaded photos.
const DEFAULT_CACHE_CONTROL_SECS: u32 = 3600;

/// Options applied to a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// MIME type recorded with the object.
    pub content_type: String,
    /// `Cache-Control: max-age` value in seconds.
    pub cache_control_secs: u32,
    /// Replace an existing object at the same key.
    pub overwrite: bool,
}

impl UploadOptions {
    /// Options for a recipe photo: JPEG, one hour cache, never overwrite.
    ///
    /// The content type is fixed regardless of the bytes supplied.
    #[must_use]
    pub fn jpeg() -> Self {
        Self {
            content_type: JPEG_CONTENT_TYPE.to_owned(),
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
            overwrite: false,
        }
    }
}

/// Hosted binary-object service.
#[async_trait(?Send)]
pub trait BlobStore {
    /// Store `bytes` under `key` and return the stored object's path.
    ///
    /// Implementations must fail with [`BlobError::AlreadyExists`] when the
    /// key is taken and `options.overwrite` is `false`.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, BlobError>;

    /// Resolve the public URL of the object at `path`.
    fn public_url(&self, path: &str) -> Result<String, BlobError>;

    /// Delete the object at `path`.
    async fn remove(&self, path: &str) -> Result<(), BlobError>;
}
