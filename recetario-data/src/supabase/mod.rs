//! HTTP clients for a Supabase-style backend.
//!
//! [`PostgrestCollection`] implements [`recetario_core::RecipeCollection`]
//! against the PostgREST endpoint and [`StorageBucket`] implements
//! [`recetario_core::BlobStore`] against the storage API. Both share one
//! [`SupabaseClient`], which carries the connection pool and attaches the
//! `apikey` and bearer headers to every request.
//!
//! # Example
//!
//! ```no_run
//! use recetario_data::supabase::{PostgrestCollection, StorageBucket, SupabaseClient};
//! use recetario_data::SupabaseConfig;
//!
//! let client = SupabaseClient::new(SupabaseConfig::new("https://abc.supabase.co", "anon-key"))?;
//! let recipes = PostgrestCollection::new(client.clone());
//! let photos = StorageBucket::new(client);
//! # let _ = (recipes, photos);
//! # Ok::<(), recetario_data::BackendBuildError>(())
//! ```

mod client;
mod config;
mod postgrest;
mod storage;

pub use client::SupabaseClient;
pub use config::{
    BackendBuildError, DEFAULT_BUCKET, DEFAULT_TABLE, DEFAULT_USER_AGENT, SupabaseConfig,
};
pub use postgrest::PostgrestCollection;
pub use storage::StorageBucket;
