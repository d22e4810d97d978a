//! HTTP backend for Recetario.
//!
//! Responsibilities:
//! - Implement the core boundary traits against a Supabase-style backend.
//! - Load picked photos from local files and URLs.
//!
//! Boundaries:
//! - Do not encode domain rules (those live in `recetario-core`).
//! - Never retry; report every failure to the caller.
//!
//! Invariants:
//! - No global mutable state; every client is built from an explicit
//!   [`SupabaseConfig`].

pub mod resource;
pub mod supabase;

use recetario_core::RecipeStore;

pub use resource::LocalResourceLoader;
pub use supabase::{
    BackendBuildError, PostgrestCollection, StorageBucket, SupabaseClient, SupabaseConfig,
};

/// Build a [`RecipeStore`] backed by the project described in `config`.
///
/// The store has no media source attached; see
/// [`RecipeStore::with_media`].
///
/// # Errors
///
/// Returns [`BackendBuildError`] when the configuration is unusable or the
/// HTTP client cannot be built.
pub fn connect(config: SupabaseConfig) -> Result<RecipeStore, BackendBuildError> {
    let client = SupabaseClient::new(config)?;
    let resources = LocalResourceLoader::with_client(client.http().clone());
    Ok(RecipeStore::new(
        PostgrestCollection::new(client.clone()),
        StorageBucket::new(client),
        resources,
    ))
}
