//! Recipe records and the payloads used to write them.
//!
//! Field names follow the remote collection's column names on the wire
//! (`titulo`, `descripcion`, `ingredientes`, `imagen_url`) while the Rust
//! fields use English names.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier assigned to a recipe by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of the user who authored a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChefId(String);

impl ChefId {
    /// Wrap a raw user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChefId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A recipe as stored by the remote collection.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use recetario_core::{ChefId, Recipe, RecipeId};
///
/// let recipe = Recipe {
///     id: RecipeId::new("r1"),
///     title: "Pasta".into(),
///     description: "Simple pasta".into(),
///     ingredients: vec!["tomato".into(), "pasta".into()],
///     chef_id: ChefId::new("u1"),
///     image_url: None,
///     created_at: Utc.timestamp_opt(0, 0).unwrap(),
/// };
/// assert!(recipe.has_ingredient("Tomato"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Identifier assigned on creation.
    pub id: RecipeId,
    /// Display title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Free-form description.
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Lowercase ingredient tokens.
    #[serde(rename = "ingredientes", default)]
    pub ingredients: Vec<String>,
    /// Author of the recipe.
    pub chef_id: ChefId,
    /// Public URL of the recipe photo, if one was uploaded.
    #[serde(rename = "imagen_url", default)]
    pub image_url: Option<String>,
    /// Creation timestamp; the sole sort key.
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Return whether the recipe lists `token`, ignoring case.
    ///
    /// Whitespace is significant: `" tomato"` does not match `"tomato"`.
    #[must_use]
    pub fn has_ingredient(&self, token: &str) -> bool {
        let needle = token.to_lowercase();
        self.ingredients.iter().any(|item| *item == needle)
    }
}

/// Normalise an ingredient token for storage.
///
/// Tokens are trimmed and lowercased before they are written.
#[must_use]
pub fn normalise_ingredient(token: &str) -> String {
    token.trim().to_lowercase()
}

fn normalise_ingredients<I, S>(ingredients: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ingredients
        .into_iter()
        .map(|item| normalise_ingredient(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Validation failures for [`NewRecipe`] and [`RecipeEdit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeDraftError {
    /// The title was empty or whitespace.
    #[error("recipe title must not be empty")]
    EmptyTitle,
    /// The description was empty or whitespace.
    #[error("recipe description must not be empty")]
    EmptyDescription,
}

fn validate_text(title: &str, description: &str) -> Result<(String, String), RecipeDraftError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RecipeDraftError::EmptyTitle);
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(RecipeDraftError::EmptyDescription);
    }
    Ok((title.to_owned(), description.to_owned()))
}

/// Fields supplied by a chef when creating a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Normalised ingredient tokens.
    pub ingredients: Vec<String>,
    /// Author of the recipe.
    pub chef_id: ChefId,
}

impl NewRecipe {
    /// Validate and normalise a new recipe.
    ///
    /// # Examples
    ///
    /// ```
    /// use recetario_core::{ChefId, NewRecipe};
    ///
    /// # fn main() -> Result<(), recetario_core::RecipeDraftError> {
    /// let draft = NewRecipe::new("Pasta", "Simple pasta", ["Tomato ", "", "pasta"], ChefId::new("u1"))?;
    /// assert_eq!(draft.ingredients, vec!["tomato", "pasta"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<I, S>(
        title: &str,
        description: &str,
        ingredients: I,
        chef_id: ChefId,
    ) -> Result<Self, RecipeDraftError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (title, description) = validate_text(title, description)?;
        Ok(Self {
            title,
            description,
            ingredients: normalise_ingredients(ingredients),
            chef_id,
        })
    }
}

/// Fields a chef may change on an existing recipe.
///
/// There is deliberately no author field: the chef never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeEdit {
    /// Replacement title.
    pub title: String,
    /// Replacement description.
    pub description: String,
    /// Replacement ingredient tokens.
    pub ingredients: Vec<String>,
}

impl RecipeEdit {
    /// Validate and normalise an edit.
    pub fn new<I, S>(title: &str, description: &str, ingredients: I) -> Result<Self, RecipeDraftError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (title, description) = validate_text(title, description)?;
        Ok(Self {
            title,
            description,
            ingredients: normalise_ingredients(ingredients),
        })
    }
}

/// Row sent to the remote collection on insert.
///
/// `imagen_url` is always present and serialises as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRow {
    /// Display title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Free-form description.
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Normalised ingredient tokens.
    #[serde(rename = "ingredientes")]
    pub ingredients: Vec<String>,
    /// Author of the recipe.
    pub chef_id: ChefId,
    /// Public URL of an uploaded image.
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
}

impl RecipeRow {
    /// Build an insert row from a validated draft.
    #[must_use]
    pub fn new(recipe: NewRecipe, image_url: Option<String>) -> Self {
        Self {
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients,
            chef_id: recipe.chef_id,
            image_url,
        }
    }
}

/// Partial update sent to the remote collection.
///
/// `imagen_url` is omitted from the payload unless a new image was uploaded,
/// leaving the stored URL untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipePatch {
    /// Replacement title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Replacement description.
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Replacement ingredient tokens.
    #[serde(rename = "ingredientes")]
    pub ingredients: Vec<String>,
    /// Public URL of a newly uploaded image.
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RecipePatch {
    /// Build a patch from a validated edit.
    #[must_use]
    pub fn new(edit: RecipeEdit, image_url: Option<String>) -> Self {
        Self {
            title: edit.title,
            description: edit.description,
            ingredients: edit.ingredients,
            image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "desc", RecipeDraftError::EmptyTitle)]
    #[case("   ", "desc", RecipeDraftError::EmptyTitle)]
    #[case("Pasta", "", RecipeDraftError::EmptyDescription)]
    #[case("Pasta", " \t", RecipeDraftError::EmptyDescription)]
    fn new_recipe_rejects_blank_text(
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: RecipeDraftError,
    ) {
        let err = NewRecipe::new(title, description, ["tomato"], ChefId::new("u1"))
            .expect_err("blank text should be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn new_recipe_normalises_ingredients() {
        let draft = NewRecipe::new(" Pasta ", "Simple", ["Tomato", "  ", " BASIL "], ChefId::new("u1"))
            .expect("valid draft");
        assert_eq!(draft.title, "Pasta");
        assert_eq!(draft.ingredients, vec!["tomato", "basil"]);
    }

    #[rstest]
    fn edit_rejects_blank_title() {
        let err = RecipeEdit::new("", "desc", Vec::<String>::new()).expect_err("blank title");
        assert_eq!(err, RecipeDraftError::EmptyTitle);
    }

    #[rstest]
    fn insert_row_serialises_null_image() {
        let draft = NewRecipe::new("Pasta", "Simple", ["tomato"], ChefId::new("u1"))
            .expect("valid draft");
        let json = serde_json::to_value(RecipeRow::new(draft, None)).expect("serialise row");
        assert_eq!(json["imagen_url"], serde_json::Value::Null);
        assert_eq!(json["titulo"], "Pasta");
        assert_eq!(json["chef_id"], "u1");
    }

    #[rstest]
    fn patch_omits_image_without_upload() {
        let edit = RecipeEdit::new("Pasta", "Simple", ["tomato"]).expect("valid edit");
        let json = serde_json::to_value(RecipePatch::new(edit, None)).expect("serialise patch");
        let object = json.as_object().expect("patch is an object");
        assert!(!object.contains_key("imagen_url"));
        assert!(!object.contains_key("chef_id"));
    }

    #[rstest]
    fn patch_includes_new_image() {
        let edit = RecipeEdit::new("Pasta", "Simple", ["tomato"]).expect("valid edit");
        let patch = RecipePatch::new(edit, Some("https://cdn.example/x.jpg".into()));
        let json = serde_json::to_value(patch).expect("serialise patch");
        assert_eq!(json["imagen_url"], "https://cdn.example/x.jpg");
    }

    #[rstest]
    fn recipe_deserialises_remote_row() {
        let json = r#"{
            "id": "9b1c",
            "titulo": "Pasta",
            "descripcion": "Simple pasta",
            "ingredientes": ["tomato", "pasta"],
            "chef_id": "u1",
            "imagen_url": null,
            "created_at": "2024-05-01T12:00:00+00:00"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).expect("deserialise row");
        assert_eq!(recipe.id.as_str(), "9b1c");
        assert_eq!(recipe.image_url, None);
        assert!(recipe.has_ingredient("PASTA"));
        assert!(!recipe.has_ingredient("basil"));
        assert!(!recipe.has_ingredient(" pasta"));
        assert!(!recipe.has_ingredient(""));
    }
}
