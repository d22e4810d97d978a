//! Facade crate for the Recetario recipe backend.
//!
//! This crate re-exports the core domain types and exposes the HTTP backend
//! behind the `backend-supabase` feature.

#![forbid(unsafe_code)]

pub use recetario_core::{
    Alerter, BlobError, BlobStore, ChefId, CollectionError, IngredientFilter, LogAlerter,
    MediaError, MediaKind, MediaSource, NewRecipe, PermissionStatus, PickOutcome, PickerOptions,
    Recipe, RecipeCollection, RecipeDraftError, RecipeEdit, RecipeError, RecipeId,
    RecipeListController, RecipePatch, RecipeQuery, RecipeRow, RecipeStore, ResourceError,
    ResourceLoader, UnavailableMediaSource, UploadOptions, normalise_ingredient,
};

#[cfg(feature = "backend-supabase")]
pub use recetario_data::{
    BackendBuildError, LocalResourceLoader, PostgrestCollection, StorageBucket, SupabaseClient,
    SupabaseConfig, connect,
};

#[cfg(feature = "test-support")]
pub use recetario_core::test_support;
