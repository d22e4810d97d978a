//! Remote blob store holding uploaded recipe photos.

mod error;
mod provider;

pub use error::BlobError;
pub use provider::{BlobStore, JPEG_CONTENT_TYPE, UploadOptions};
