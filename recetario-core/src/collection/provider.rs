//! Collection trait and the query description it consumes.

use async_trait::async_trait;

use crate::{Recipe, RecipeId, RecipePatch, RecipeRow};

use super::error::CollectionError;

/// Predicate over the `ingredientes` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientFilter {
    /// The ingredient array holds exactly this lower-cased token.
    Contains(String),
}

/// Selection parameters for [`RecipeCollection::select`].
///
/// Results are always ordered newest first by `created_at`.
///
/// # Examples
///
/// ```
/// use recetario_core::collection::{IngredientFilter, RecipeQuery};
///
/// let query = RecipeQuery::for_search("Tomato");
/// assert_eq!(query.filter, Some(IngredientFilter::Contains("tomato".into())));
/// assert_ne!(RecipeQuery::for_search(""), RecipeQuery::all());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeQuery {
    /// Optional ingredient predicate.
    pub filter: Option<IngredientFilter>,
}

impl RecipeQuery {
    /// Every recipe, newest first.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Recipes whose ingredient list holds `token`, newest first.
    ///
    /// The token is lower-cased and otherwise kept as given, so a blank or
    /// padded token matches no stored ingredient.
    #[must_use]
    pub fn for_search(token: &str) -> Self {
        Self {
            filter: Some(IngredientFilter::Contains(token.to_lowercase())),
        }
    }

    /// The lower-cased search token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.filter.as_ref().map(|IngredientFilter::Contains(token)| token.as_str())
    }

    /// Return whether `recipe` satisfies the filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.token().is_none_or(|token| recipe.has_ingredient(token))
    }
}

/// Hosted structured-data service holding recipe rows.
///
/// Implementations perform one remote round trip per call and never retry.
/// The trait is `?Send`: callers drive it on a single-threaded executor.
#[async_trait(?Send)]
pub trait RecipeCollection {
    /// Fetch every record matching `query`, newest first.
    async fn select(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, CollectionError>;

    /// Insert `row` and return the stored record with its assigned id and
    /// timestamp.
    async fn insert(&self, row: &RecipeRow) -> Result<Recipe, CollectionError>;

    /// Apply `patch` to the record `id` and return the updated record.
    ///
    /// Implementations must return [`CollectionError::NotFound`] when no
    /// record matches.
    async fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, CollectionError>;

    /// Remove the record `id`.
    async fn delete(&self, id: &RecipeId) -> Result<(), CollectionError>;
}
