//! In-memory collaborators used by unit and behaviour tests.
//!
//! Each double shares its state behind an `Rc`, so a clone handed to a
//! [`RecipeStore`](crate::store::RecipeStore) can still be inspected by the
//! test that created it.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::blob::{BlobError, BlobStore, UploadOptions};
use crate::collection::{CollectionError, RecipeCollection, RecipeQuery};
use crate::media::{Alerter, MediaError, MediaKind, MediaSource, PermissionStatus, PickOutcome, PickerOptions};
use crate::resource::{ResourceError, ResourceLoader};
use crate::{Recipe, RecipeId, RecipePatch, RecipeRow};

/// Collection operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionOp {
    /// [`RecipeCollection::select`].
    Select,
    /// [`RecipeCollection::insert`].
    Insert,
    /// [`RecipeCollection::update`].
    Update,
    /// [`RecipeCollection::delete`].
    Delete,
}

#[derive(Debug, Default)]
struct CollectionState {
    rows: Vec<Recipe>,
    inserted: u64,
    failures: HashMap<CollectionOp, CollectionError>,
    calls: Vec<CollectionOp>,
}

/// In-memory [`RecipeCollection`] that assigns ids and timestamps like the
/// remote store.
///
/// Inserted rows get ids `recipe-1`, `recipe-2`, ... and strictly increasing
/// `created_at` values one minute apart, so newest-first order is stable.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    state: Rc<RefCell<CollectionState>>,
}

impl MemoryCollection {
    /// Create a collection holding `recipes`.
    pub fn with_recipes<I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = Recipe>,
    {
        let collection = Self::default();
        collection.state.borrow_mut().rows = recipes.into_iter().collect();
        collection
    }

    /// Make every subsequent `op` call fail with `error`.
    pub fn fail(&self, op: CollectionOp, error: CollectionError) {
        self.state.borrow_mut().failures.insert(op, error);
    }

    /// Stop failing `op` calls.
    pub fn recover(&self, op: CollectionOp) {
        self.state.borrow_mut().failures.remove(&op);
    }

    /// Snapshot of the stored rows in insertion order.
    #[must_use]
    pub fn recipes(&self) -> Vec<Recipe> {
        self.state.borrow().rows.clone()
    }

    /// Look up a stored row.
    #[must_use]
    pub fn get(&self, id: &RecipeId) -> Option<Recipe> {
        self.state.borrow().rows.iter().find(|row| row.id == *id).cloned()
    }

    /// Operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CollectionOp> {
        self.state.borrow().calls.clone()
    }

    fn begin(&self, op: CollectionOp) -> Result<(), CollectionError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(op);
        state.failures.get(&op).cloned().map_or(Ok(()), Err)
    }
}

/// Timestamp given to the `n`th inserted row.
#[must_use]
pub fn insertion_time(n: u64) -> DateTime<Utc> {
    let base = Utc
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    let minutes = i64::try_from(n).unwrap_or(i64::MAX);
    base + Duration::minutes(minutes)
}

#[async_trait(?Send)]
impl RecipeCollection for MemoryCollection {
    async fn select(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, CollectionError> {
        self.begin(CollectionOp::Select)?;
        let mut rows: Vec<Recipe> = self
            .state
            .borrow()
            .rows
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, row: &RecipeRow) -> Result<Recipe, CollectionError> {
        self.begin(CollectionOp::Insert)?;
        let mut state = self.state.borrow_mut();
        state.inserted += 1;
        let recipe = Recipe {
            id: RecipeId::new(format!("recipe-{}", state.inserted)),
            title: row.title.clone(),
            description: row.description.clone(),
            ingredients: row.ingredients.clone(),
            chef_id: row.chef_id.clone(),
            image_url: row.image_url.clone(),
            created_at: insertion_time(state.inserted),
        };
        state.rows.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, CollectionError> {
        self.begin(CollectionOp::Update)?;
        let mut state = self.state.borrow_mut();
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == *id)
            .ok_or_else(|| CollectionError::NotFound { id: id.clone() })?;
        row.title.clone_from(&patch.title);
        row.description.clone_from(&patch.description);
        row.ingredients.clone_from(&patch.ingredients);
        if let Some(url) = &patch.image_url {
            row.image_url = Some(url.clone());
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: &RecipeId) -> Result<(), CollectionError> {
        self.begin(CollectionOp::Delete)?;
        self.state.borrow_mut().rows.retain(|row| row.id != *id);
        Ok(())
    }
}

/// Public URL prefix used by [`MemoryBlobStore`].
pub const MEMORY_PUBLIC_BASE: &str = "https://blobs.test/public/recetas-fotos";

#[derive(Debug, Default)]
struct BlobState {
    objects: BTreeMap<String, (Vec<u8>, UploadOptions)>,
    upload_failure: Option<BlobError>,
    remove_failure: Option<BlobError>,
}

/// In-memory [`BlobStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    state: Rc<RefCell<BlobState>>,
}

impl MemoryBlobStore {
    /// Make every subsequent upload fail with `error`.
    pub fn fail_uploads(&self, error: BlobError) {
        self.state.borrow_mut().upload_failure = Some(error);
    }

    /// Make every subsequent removal fail with `error`.
    pub fn fail_removals(&self, error: BlobError) {
        self.state.borrow_mut().remove_failure = Some(error);
    }

    /// Paths of the stored objects.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.state.borrow().objects.keys().cloned().collect()
    }

    /// Bytes and options stored at `path`.
    #[must_use]
    pub fn object(&self, path: &str) -> Option<(Vec<u8>, UploadOptions)> {
        self.state.borrow().objects.get(path).cloned()
    }
}

#[async_trait(?Send)]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, BlobError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = &state.upload_failure {
            return Err(error.clone());
        }
        if !options.overwrite && state.objects.contains_key(key) {
            return Err(BlobError::AlreadyExists {
                path: key.to_owned(),
            });
        }
        state
            .objects
            .insert(key.to_owned(), (bytes, options.clone()));
        Ok(key.to_owned())
    }

    fn public_url(&self, path: &str) -> Result<String, BlobError> {
        if path.is_empty() {
            return Err(BlobError::InvalidPath {
                path: path.to_owned(),
            });
        }
        Ok(format!("{MEMORY_PUBLIC_BASE}/{path}"))
    }

    async fn remove(&self, path: &str) -> Result<(), BlobError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = &state.remove_failure {
            return Err(error.clone());
        }
        state.objects.remove(path);
        Ok(())
    }
}

/// In-memory [`ResourceLoader`] keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryResources {
    /// Register `bytes` under `uri`.
    #[must_use]
    pub fn with_file(self, uri: &str, bytes: &[u8]) -> Self {
        self.files.borrow_mut().insert(uri.to_owned(), bytes.to_vec());
        self
    }
}

#[async_trait(?Send)]
impl ResourceLoader for MemoryResources {
    async fn load(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
        self.files
            .borrow()
            .get(uri)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                uri: uri.to_owned(),
            })
    }
}

#[derive(Debug, Default)]
struct MediaState {
    permissions: HashMap<MediaKind, PermissionStatus>,
    outcomes: VecDeque<Result<PickOutcome, MediaError>>,
    launches: Vec<(MediaKind, PickerOptions)>,
}

/// [`MediaSource`] that answers from a script.
///
/// Permissions default to [`PermissionStatus::Granted`]; launches pop
/// queued outcomes and report [`PickOutcome::Cancelled`] once the queue is
/// empty.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMediaSource {
    state: Rc<RefCell<MediaState>>,
}

impl ScriptedMediaSource {
    /// Answer permission prompts for `kind` with `status`.
    #[must_use]
    pub fn with_permission(self, kind: MediaKind, status: PermissionStatus) -> Self {
        self.state.borrow_mut().permissions.insert(kind, status);
        self
    }

    /// Queue the result of the next launch.
    #[must_use]
    pub fn then_outcome(self, outcome: Result<PickOutcome, MediaError>) -> Self {
        self.state.borrow_mut().outcomes.push_back(outcome);
        self
    }

    /// Surfaces launched so far with the options they received.
    #[must_use]
    pub fn launches(&self) -> Vec<(MediaKind, PickerOptions)> {
        self.state.borrow().launches.clone()
    }
}

#[async_trait(?Send)]
impl MediaSource for ScriptedMediaSource {
    async fn request_permission(&self, kind: MediaKind) -> Result<PermissionStatus, MediaError> {
        Ok(self
            .state
            .borrow()
            .permissions
            .get(&kind)
            .copied()
            .unwrap_or(PermissionStatus::Granted))
    }

    async fn launch(
        &self,
        kind: MediaKind,
        options: &PickerOptions,
    ) -> Result<PickOutcome, MediaError> {
        let mut state = self.state.borrow_mut();
        state.launches.push((kind, *options));
        state
            .outcomes
            .pop_front()
            .unwrap_or(Ok(PickOutcome::Cancelled))
    }
}

/// [`Alerter`] that records every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerter {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingAlerter {
    /// Messages shown so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}
