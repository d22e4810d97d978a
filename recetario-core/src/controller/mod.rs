//! In-memory recipe list kept consistent with the remote collection.
//!
//! [`RecipeListController`] is the presentation-facing half of the data
//! layer. It owns the list currently on screen, a loading flag and the
//! active ingredient filter, and re-runs the active view after every
//! successful mutation. [`RecipeListController::load`] builds one and
//! fetches the first page of recipes.
//!
//! Methods take `&self` and keep their state in `Cell`/`RefCell`, so
//! several operations may be in flight on a single-threaded executor at
//! once. Each fetch takes a ticket; when a fetch completes after a newer
//! one was issued its response is dropped, so the list always reflects the
//! most recently requested view.

use std::cell::{Cell, RefCell};

use crate::collection::RecipeQuery;
use crate::store::{RecipeError, RecipeStore};
use crate::{NewRecipe, Recipe, RecipeEdit, RecipeId};

/// Owns the visible recipe list and the loading flag.
#[derive(Debug)]
pub struct RecipeListController {
    store: RecipeStore,
    items: RefCell<Vec<Recipe>>,
    loading: Cell<bool>,
    filter: RefCell<Option<String>>,
    last_error: RefCell<Option<RecipeError>>,
    issued: Cell<u64>,
}

impl RecipeListController {
    /// Create a controller with an empty list that has not loaded yet.
    ///
    /// [`RecipeListController::is_loading`] reports `true` until the first
    /// [`RecipeListController::refresh`] settles. Most callers want
    /// [`RecipeListController::load`] instead.
    #[must_use]
    pub fn new(store: RecipeStore) -> Self {
        Self {
            store,
            items: RefCell::new(Vec::new()),
            loading: Cell::new(true),
            filter: RefCell::new(None),
            last_error: RefCell::new(None),
            issued: Cell::new(0),
        }
    }

    /// Create a controller and fetch every recipe.
    ///
    /// A failed first fetch leaves the list empty; the error is logged and
    /// kept in [`RecipeListController::last_error`].
    pub async fn load(store: RecipeStore) -> Self {
        let controller = Self::new(store);
        if let Err(err) = controller.refresh().await {
            log::warn!("initial recipe load failed: {err}");
        }
        controller
    }

    /// The store backing this controller.
    #[must_use]
    pub const fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Snapshot of the visible recipes.
    #[must_use]
    pub fn items(&self) -> Vec<Recipe> {
        self.items.borrow().clone()
    }

    /// Whether the most recently issued fetch is still outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Lower-cased ingredient token of the active search, if any.
    #[must_use]
    pub fn active_filter(&self) -> Option<String> {
        self.filter.borrow().clone()
    }

    /// Error from the last fetch, cleared by the next successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<RecipeError> {
        self.last_error.borrow().clone()
    }

    /// Re-run the active view: the current search, or every recipe.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The previous items are kept and the error
    /// is also available from [`RecipeListController::last_error`].
    pub async fn refresh(&self) -> Result<(), RecipeError> {
        let query = self.active_query();
        self.run(&query).await
    }

    /// Replace the list with recipes containing `token`.
    ///
    /// The filter stays applied to later refreshes until
    /// [`RecipeListController::clear_search`]. Matching only folds case, so a
    /// blank token shows an empty list.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeListController::refresh`].
    pub async fn search(&self, token: &str) -> Result<(), RecipeError> {
        self.filter.replace(Some(token.to_lowercase()));
        self.refresh().await
    }

    /// Forget the active search and load every recipe.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeListController::refresh`].
    pub async fn clear_search(&self) -> Result<(), RecipeError> {
        self.filter.replace(None);
        self.refresh().await
    }

    /// Create a recipe and refresh the active view.
    ///
    /// # Errors
    ///
    /// Returns the store error; the list is left untouched. A refresh
    /// failure after a successful create is logged and recorded in
    /// [`RecipeListController::last_error`] instead.
    pub async fn create(
        &self,
        recipe: NewRecipe,
        image_uri: Option<&str>,
    ) -> Result<Recipe, RecipeError> {
        let created = self.store.create(recipe, image_uri).await?;
        self.refresh_after_change().await;
        Ok(created)
    }

    /// Update a recipe and refresh the active view.
    ///
    /// # Errors
    ///
    /// As for [`RecipeListController::create`].
    pub async fn update(
        &self,
        id: &RecipeId,
        edit: RecipeEdit,
        image_uri: Option<&str>,
    ) -> Result<Recipe, RecipeError> {
        let updated = self.store.update(id, edit, image_uri).await?;
        self.refresh_after_change().await;
        Ok(updated)
    }

    /// Delete a recipe and refresh the active view.
    ///
    /// # Errors
    ///
    /// As for [`RecipeListController::create`].
    pub async fn delete(&self, id: &RecipeId) -> Result<(), RecipeError> {
        self.store.delete(id).await?;
        self.refresh_after_change().await;
        Ok(())
    }

    /// Let the user pick a photo from their library.
    pub async fn pick_image(&self) -> Option<String> {
        self.store.pick_from_library().await
    }

    /// Let the user take a photo with the camera.
    pub async fn take_photo(&self) -> Option<String> {
        self.store.capture_from_camera().await
    }

    fn active_query(&self) -> RecipeQuery {
        self.filter
            .borrow()
            .as_deref()
            .map_or_else(RecipeQuery::all, RecipeQuery::for_search)
    }

    async fn refresh_after_change(&self) {
        if let Err(err) = self.refresh().await {
            log::warn!("failed to refresh recipes after a change: {err}");
        }
    }

    async fn run(&self, query: &RecipeQuery) -> Result<(), RecipeError> {
        let ticket = self.issued.get().wrapping_add(1);
        self.issued.set(ticket);
        self.loading.set(true);

        let result = self.store.fetch(query).await;

        if ticket != self.issued.get() {
            log::debug!("discarding stale recipe response {ticket}");
            return Ok(());
        }
        self.loading.set(false);
        match result {
            Ok(recipes) => {
                self.items.replace(recipes);
                self.last_error.replace(None);
                Ok(())
            }
            Err(err) => {
                self.last_error.replace(Some(err.clone()));
                Err(err)
            }
        }
    }
}
