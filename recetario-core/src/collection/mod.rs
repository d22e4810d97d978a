//! Remote collection holding recipe rows.
//!
//! The [`RecipeCollection`] trait abstracts the hosted structured-data
//! service: filtered and ordered selection, insert, partial update and
//! delete over a single collection.

mod error;
mod provider;

pub use error::CollectionError;
pub use provider::{IngredientFilter, RecipeCollection, RecipeQuery};
