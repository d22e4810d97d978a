//! Behavioural tests for [`RecipeListController`].

use std::cell::RefCell;
use std::future::Future;

use recetario_core::test_support::{
    CollectionOp, MemoryBlobStore, MemoryCollection, MemoryResources,
};
use recetario_core::{
    ChefId, CollectionError, NewRecipe, RecipeError, RecipeListController, RecipeStore,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// World state shared by the controller scenarios.
struct ControllerWorld {
    collection: MemoryCollection,
    controller: RecipeListController,
    outcome: RefCell<Option<Result<(), RecipeError>>>,
}

#[fixture]
fn world() -> ControllerWorld {
    let collection = MemoryCollection::default();
    let store = RecipeStore::new(
        collection.clone(),
        MemoryBlobStore::default(),
        MemoryResources::default(),
    );
    ControllerWorld {
        collection,
        controller: RecipeListController::new(store),
        outcome: RefCell::new(None),
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
        .block_on(future)
}

fn draft(title: &str, ingredients: &str) -> NewRecipe {
    NewRecipe::new(title, "Tried and tested", ingredients.split(','), ChefId::new("u1"))
        .expect("valid draft")
}

// --- Given steps ---

#[given("a fresh controller")]
fn fresh_controller(world: &ControllerWorld) {
    assert!(world.controller.items().is_empty());
}

#[given("a controller over Pasta and Salad")]
fn controller_over_pasta_and_salad(world: &ControllerWorld) {
    block_on(async {
        world
            .controller
            .create(draft("Pasta", "tomato,pasta"), None)
            .await
            .expect("create Pasta");
        world
            .controller
            .create(draft("Salad", "lettuce,cucumber"), None)
            .await
            .expect("create Salad");
    });
}

#[given("the collection is unreachable")]
fn collection_unreachable(world: &ControllerWorld) {
    world.collection.fail(
        CollectionOp::Select,
        CollectionError::Network {
            url: "https://db.test/rest/v1/recetas".to_owned(),
            message: "connection refused".to_owned(),
        },
    );
}

// --- When steps ---

#[when("I search for {token:word}")]
fn search_for(world: &ControllerWorld, token: String) {
    world
        .outcome
        .replace(Some(block_on(world.controller.search(&token))));
}

#[when("I create a recipe {title:word} with ingredients {ingredients:word}")]
fn create_recipe(world: &ControllerWorld, title: String, ingredients: String) {
    block_on(world.controller.create(draft(&title, &ingredients), None)).expect("create succeeds");
}

#[when("I clear the search")]
fn clear_search(world: &ControllerWorld) {
    world
        .outcome
        .replace(Some(block_on(world.controller.clear_search())));
}

#[when("I refresh the list")]
fn refresh_list(world: &ControllerWorld) {
    world
        .outcome
        .replace(Some(block_on(world.controller.refresh())));
}

// --- Then steps ---

#[then("the list shows {titles:word}")]
fn list_shows(world: &ControllerWorld, titles: String) {
    let expected: Vec<&str> = titles.split(',').collect();
    let actual: Vec<String> = world
        .controller
        .items()
        .into_iter()
        .map(|recipe| recipe.title)
        .collect();
    assert_eq!(actual, expected);
}

#[then("the list is empty")]
fn list_empty(world: &ControllerWorld) {
    assert!(world.controller.items().is_empty());
}

#[then("the active filter is {token:word}")]
fn active_filter_is(world: &ControllerWorld, token: String) {
    assert_eq!(world.controller.active_filter(), Some(token));
}

#[then("no filter is active")]
fn no_filter_active(world: &ControllerWorld) {
    assert_eq!(world.controller.active_filter(), None);
}

#[then("the refresh error is recorded")]
fn refresh_error_recorded(world: &ControllerWorld) {
    let outcome = world.outcome.borrow();
    let Some(Err(err)) = &*outcome else {
        panic!("expected a failed refresh, got {outcome:?}");
    };
    assert_eq!(world.controller.last_error().as_ref(), Some(err));
    assert!(err.to_string().contains("connection refused"));
}

#[then("the controller is still loading")]
fn controller_loading(world: &ControllerWorld) {
    assert!(world.controller.is_loading());
}

#[then("the controller is idle")]
fn controller_idle(world: &ControllerWorld) {
    assert!(!world.controller.is_loading());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/recipe_list_controller.feature", name = $title)]
        fn $fn_name(world: ControllerWorld) {
            let _ = world;
        }
    };
}

register_scenario!(mutations_keep_search, "mutations keep the active search");
register_scenario!(clearing_the_search, "clearing the search");
register_scenario!(failed_refresh_keeps_list, "a failed refresh keeps the previous list");
register_scenario!(first_fetch_settles_loading, "a fresh controller loads on its first refresh");
