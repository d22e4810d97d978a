//! Platform media source: permission prompts, the photo library picker
//! and the camera.
//!
//! Permission denial is not an error. The store reports it to the user
//! through an [`Alerter`] and yields no image.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Which media surface to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// The photo library picker.
    Library,
    /// The camera capture UI.
    Camera,
}

impl MediaKind {
    /// User-facing message shown when permission is refused.
    #[must_use]
    pub const fn permission_message(self) -> &'static str {
        match self {
            Self::Library => "We need permission to access your photos",
            Self::Camera => "We need permission to access your camera",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("photo library"),
            Self::Camera => f.write_str("camera"),
        }
    }
}

/// Outcome of a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Access was granted.
    Granted,
    /// Access was refused.
    Denied,
}

/// Crop and compression settings passed to the picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerOptions {
    /// Let the user crop before returning.
    pub allows_editing: bool,
    /// Crop aspect ratio as `(width, height)`.
    pub aspect: (u8, u8),
    /// Compression quality in `[0.0, 1.0]`.
    pub quality: f32,
}

impl PickerOptions {
    /// Editable 4:3 crop at quality 0.8.
    #[must_use]
    pub const fn cropped_photo() -> Self {
        Self {
            allows_editing: true,
            aspect: (4, 3),
            quality: 0.8,
        }
    }
}

/// Result of opening the picker or camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user chose or captured an image.
    Picked {
        /// Local locator of the image.
        uri: String,
    },
    /// The user dismissed the picker.
    Cancelled,
}

/// Failure inside the media source itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// No media surface is available on this platform.
    #[error("{kind} is not available")]
    Unavailable {
        /// Surface that was requested.
        kind: MediaKind,
    },
    /// The platform reported an error.
    #[error("{kind} failed: {message}")]
    Platform {
        /// Surface that was requested.
        kind: MediaKind,
        /// Platform error description.
        message: String,
    },
}

/// Platform permission prompt and single-image picker.
#[async_trait(?Send)]
pub trait MediaSource {
    /// Ask the user for access to `kind`.
    async fn request_permission(&self, kind: MediaKind) -> Result<PermissionStatus, MediaError>;

    /// Open the surface for `kind` and wait for the user.
    async fn launch(&self, kind: MediaKind, options: &PickerOptions)
    -> Result<PickOutcome, MediaError>;
}

/// Blocking user-facing notification.
pub trait Alerter {
    /// Show `message` to the user.
    fn alert(&self, message: &str);
}

/// Media source for hosts without a library or camera.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMediaSource;

#[async_trait(?Send)]
impl MediaSource for UnavailableMediaSource {
    async fn request_permission(&self, kind: MediaKind) -> Result<PermissionStatus, MediaError> {
        Err(MediaError::Unavailable { kind })
    }

    async fn launch(
        &self,
        kind: MediaKind,
        _options: &PickerOptions,
    ) -> Result<PickOutcome, MediaError> {
        Err(MediaError::Unavailable { kind })
    }
}

/// Alerter that writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, message: &str) {
        log::warn!("{message}");
    }
}
