//! Recipe data access: translating intents into remote calls.
//!
//! [`RecipeStore`] owns no state of its own. Each operation performs the
//! remote calls it needs in order and reports failures as a [`RecipeError`].
//! Nothing is retried.
//!
//! # Image handling
//!
//! When an operation receives an image locator, the image is uploaded
//! before the record is written. If the write then fails the uploaded
//! object is removed again so the blob store does not accumulate orphans.
//! Deleting a recipe leaves its photo in place.

use std::fmt;

use thiserror::Error;

use crate::blob::{BlobError, BlobStore, UploadOptions};
use crate::collection::{CollectionError, RecipeCollection, RecipeQuery};
use crate::media::{
    Alerter, LogAlerter, MediaError, MediaKind, MediaSource, PermissionStatus, PickOutcome,
    PickerOptions, UnavailableMediaSource,
};
use crate::object_key::fresh_object_key;
use crate::resource::{ResourceError, ResourceLoader};
use crate::{NewRecipe, Recipe, RecipeDraftError, RecipeEdit, RecipeId, RecipePatch, RecipeRow};

/// Failures reported by [`RecipeStore`] operations.
///
/// The `Display` output is suitable for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// The recipe fields failed validation.
    #[error(transparent)]
    Draft(#[from] RecipeDraftError),
    /// The remote collection failed or rejected the request.
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// The local image could not be read.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// Uploading the image failed.
    #[error("failed to upload image: {0}")]
    Upload(#[source] BlobError),
    /// The uploaded image has no resolvable public URL.
    #[error("failed to resolve public URL for {path}: {source}")]
    PublicUrl {
        /// Stored object path.
        path: String,
        /// Underlying blob store error.
        #[source]
        source: BlobError,
    },
}

/// An uploaded image: where it lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UploadedImage {
    path: String,
    url: String,
}

/// Stateless recipe data-access layer.
///
/// Construct one per composition root and share it by reference; there is
/// no global instance. Collaborators are held as trait objects so the
/// same type serves both the HTTP backend and in-memory doubles.
pub struct RecipeStore {
    collection: Box<dyn RecipeCollection>,
    blobs: Box<dyn BlobStore>,
    resources: Box<dyn ResourceLoader>,
    media: Box<dyn MediaSource>,
    alerter: Box<dyn Alerter>,
}

impl fmt::Debug for RecipeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeStore")
            .field("collection", &"<dyn RecipeCollection>")
            .field("blobs", &"<dyn BlobStore>")
            .field("resources", &"<dyn ResourceLoader>")
            .field("media", &"<dyn MediaSource>")
            .field("alerter", &"<dyn Alerter>")
            .finish()
    }
}

impl RecipeStore {
    /// Create a store without a media source.
    ///
    /// Media intents log the unavailability and yield no image until
    /// [`RecipeStore::with_media`] supplies a real source.
    pub fn new(
        collection: impl RecipeCollection + 'static,
        blobs: impl BlobStore + 'static,
        resources: impl ResourceLoader + 'static,
    ) -> Self {
        Self {
            collection: Box::new(collection),
            blobs: Box::new(blobs),
            resources: Box::new(resources),
            media: Box::new(UnavailableMediaSource),
            alerter: Box::new(LogAlerter),
        }
    }

    /// Attach the platform media source and the alert surface used when
    /// permission is refused.
    #[must_use]
    pub fn with_media(
        mut self,
        media: impl MediaSource + 'static,
        alerter: impl Alerter + 'static,
    ) -> Self {
        self.media = Box::new(media);
        self.alerter = Box::new(alerter);
        self
    }

    /// Fetch every recipe, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Collection`] when the remote fetch fails. The
    /// failure is also logged.
    pub async fn list(&self) -> Result<Vec<Recipe>, RecipeError> {
        self.fetch(&RecipeQuery::all()).await
    }

    /// Fetch recipes whose ingredient list holds `token`, ignoring case.
    ///
    /// Only case is folded: a blank or padded token matches nothing, since
    /// stored ingredients are trimmed and never empty.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Collection`] when the remote fetch fails.
    pub async fn search_by_ingredient(&self, token: &str) -> Result<Vec<Recipe>, RecipeError> {
        self.fetch(&RecipeQuery::for_search(token)).await
    }

    /// Run an arbitrary selection against the collection.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Collection`] when the remote fetch fails.
    pub async fn fetch(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, RecipeError> {
        self.collection.select(query).await.map_err(|err| {
            log::warn!("failed to fetch recipes: {err}");
            RecipeError::from(err)
        })
    }

    /// Create a recipe, uploading `image_uri` first when supplied.
    ///
    /// # Errors
    ///
    /// Fails when the image cannot be read or uploaded, or when the insert
    /// is rejected. An image uploaded before a failed insert is removed.
    pub async fn create(
        &self,
        recipe: NewRecipe,
        image_uri: Option<&str>,
    ) -> Result<Recipe, RecipeError> {
        let image = self.upload_optional(image_uri).await?;
        let row = RecipeRow::new(recipe, image.as_ref().map(|uploaded| uploaded.url.clone()));
        match self.collection.insert(&row).await {
            Ok(created) => Ok(created),
            Err(err) => {
                self.discard(image.as_ref().map(|uploaded| uploaded.path.as_str()))
                    .await;
                Err(err.into())
            }
        }
    }

    /// Update a recipe's text fields and, when `image_uri` is supplied, its
    /// photo.
    ///
    /// Without an image the stored URL is left untouched.
    ///
    /// # Errors
    ///
    /// Fails when the image cannot be read or uploaded (nothing is written),
    /// or when the update is rejected. An unknown `id` yields
    /// [`CollectionError::NotFound`].
    pub async fn update(
        &self,
        id: &RecipeId,
        edit: RecipeEdit,
        image_uri: Option<&str>,
    ) -> Result<Recipe, RecipeError> {
        let image = self.upload_optional(image_uri).await?;
        let patch = RecipePatch::new(edit, image.as_ref().map(|uploaded| uploaded.url.clone()));
        match self.collection.update(id, &patch).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                self.discard(image.as_ref().map(|uploaded| uploaded.path.as_str()))
                    .await;
                Err(err.into())
            }
        }
    }

    /// Delete the recipe `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Collection`] when the remote delete fails.
    pub async fn delete(&self, id: &RecipeId) -> Result<(), RecipeError> {
        self.collection.delete(id).await?;
        Ok(())
    }

    /// Upload the image at `local_uri` and return its public URL.
    ///
    /// # Errors
    ///
    /// Fails when the image cannot be read, uploaded or resolved.
    pub async fn upload_image(&self, local_uri: &str) -> Result<String, RecipeError> {
        self.upload(local_uri).await.map(|uploaded| uploaded.url)
    }

    /// Let the user pick a photo from their library.
    ///
    /// Returns `None` when permission is refused (after alerting the user),
    /// when the picker is dismissed, or when the media source fails.
    pub async fn pick_from_library(&self) -> Option<String> {
        self.pick(MediaKind::Library).await
    }

    /// Let the user take a photo with the camera.
    ///
    /// Same contract as [`RecipeStore::pick_from_library`].
    pub async fn capture_from_camera(&self) -> Option<String> {
        self.pick(MediaKind::Camera).await
    }

    async fn upload_optional(
        &self,
        image_uri: Option<&str>,
    ) -> Result<Option<UploadedImage>, RecipeError> {
        match image_uri.filter(|uri| !uri.trim().is_empty()) {
            Some(uri) => self.upload(uri).await.map(Some),
            None => Ok(None),
        }
    }

    async fn upload(&self, local_uri: &str) -> Result<UploadedImage, RecipeError> {
        let bytes = self.resources.load(local_uri).await.inspect_err(|err| {
            log::warn!("failed to read image {local_uri}: {err}");
        })?;
        let key = fresh_object_key();
        let path = self
            .blobs
            .upload(&key, bytes, &UploadOptions::jpeg())
            .await
            .map_err(|err| {
                log::warn!("failed to upload image {key}: {err}");
                RecipeError::Upload(err)
            })?;
        match self.blobs.public_url(&path) {
            Ok(url) => Ok(UploadedImage { path, url }),
            Err(source) => {
                self.discard(Some(&path)).await;
                Err(RecipeError::PublicUrl { path, source })
            }
        }
    }

    async fn discard(&self, path: Option<&str>) {
        let Some(orphan) = path else {
            return;
        };
        if let Err(err) = self.blobs.remove(orphan).await {
            log::warn!("failed to remove orphaned image {orphan}: {err}");
        }
    }

    async fn pick(&self, kind: MediaKind) -> Option<String> {
        match self.try_pick(kind).await {
            Ok(uri) => uri,
            Err(err) => {
                log::warn!("failed to select image from {kind}: {err}");
                None
            }
        }
    }

    async fn try_pick(&self, kind: MediaKind) -> Result<Option<String>, MediaError> {
        if self.media.request_permission(kind).await? == PermissionStatus::Denied {
            self.alerter.alert(kind.permission_message());
            return Ok(None);
        }
        let outcome = self
            .media
            .launch(kind, &PickerOptions::cropped_photo())
            .await?;
        Ok(match outcome {
            PickOutcome::Picked { uri } => Some(uri),
            PickOutcome::Cancelled => None,
        })
    }
}
