//! Core domain types and data-access layer for Recetario.
//!
//! Recipes live in a hosted collection and their photos in a hosted blob
//! store. This crate defines the boundary traits for those services (plus
//! local resource loading and the platform media picker), the
//! [`RecipeStore`] that turns user intents into remote calls, and the
//! [`RecipeListController`] that keeps an on-screen list consistent with
//! the remote collection.
//!
//! All boundary traits are `?Send`: the layer runs on a single-threaded
//! cooperative executor.

pub mod blob;
pub mod collection;
pub mod controller;
pub mod media;
pub mod object_key;
mod recipe;
pub mod resource;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use blob::{BlobError, BlobStore, UploadOptions};
pub use collection::{CollectionError, IngredientFilter, RecipeCollection, RecipeQuery};
pub use controller::RecipeListController;
pub use media::{
    Alerter, LogAlerter, MediaError, MediaKind, MediaSource, PermissionStatus, PickOutcome,
    PickerOptions, UnavailableMediaSource,
};
pub use recipe::{
    ChefId, NewRecipe, Recipe, RecipeDraftError, RecipeEdit, RecipeId, RecipePatch, RecipeRow,
    normalise_ingredient,
};
pub use resource::{ResourceError, ResourceLoader};
pub use store::{RecipeError, RecipeStore};
