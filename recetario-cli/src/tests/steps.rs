//! Behaviour-driven step definitions driving the recipe command scenarios.

use super::helpers::{StubStoreBuilder, run_with_stub};
use super::*;
use recetario_core::Recipe;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state shared across steps.
#[derive(Debug)]
struct CommandWorld {
    builder: StubStoreBuilder,
    stdout: RefCell<String>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            builder: StubStoreBuilder::new(),
            stdout: RefCell::new(String::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, args: &[&str]) {
        let outcome = run_with_stub(&self.builder, args).map(|stdout| {
            self.stdout.replace(stdout);
        });
        self.result.replace(Some(outcome));
    }

    fn seed(&self, title: &str) {
        run_with_stub(
            &self.builder,
            &[
                "create",
                "--title",
                title,
                "--description",
                "Seeded",
                "--chef-id",
                "u1",
            ],
        )
        .expect("seed recipe");
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("an empty recipe collection")]
fn empty_collection(#[from(world)] world: &CommandWorld) {
    assert!(world.builder.collection.recipes().is_empty());
}

#[given("a collection holding \"{first}\" and \"{second}\"")]
fn collection_holding(#[from(world)] world: &CommandWorld, first: String, second: String) {
    world.seed(&first);
    world.seed(&second);
}

#[when("I run \"{command}\"")]
fn run_command(#[from(world)] world: &CommandWorld, command: String) {
    let args: Vec<&str> = command.split_whitespace().collect();
    world.run(&args);
}

#[when("I delete the newest recipe")]
fn delete_newest(#[from(world)] world: &CommandWorld) {
    let newest = world
        .builder
        .collection
        .recipes()
        .into_iter()
        .max_by_key(|recipe| recipe.created_at)
        .expect("a seeded recipe");
    world.run(&["delete", newest.id.as_str()]);
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CommandWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
}

#[then("the output lists {count} recipe titled \"{title}\"")]
fn output_lists(#[from(world)] world: &CommandWorld, count: usize, title: String) {
    let listed: Vec<Recipe> =
        serde_json::from_str(&world.stdout.borrow()).expect("output should be a recipe list");
    assert_eq!(listed.len(), count);
    assert!(listed.iter().all(|recipe| recipe.title == title));
}

#[then("the command fails because \"{flag}\" is missing")]
fn command_fails_missing(#[from(world)] world: &CommandWorld, flag: String) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, flag),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the collection holds {count} recipes")]
fn collection_holds(#[from(world)] world: &CommandWorld, count: usize) {
    assert_eq!(world.builder.collection.recipes().len(), count);
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/recipe_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(create_then_search, "creating then searching from the terminal");
register_command_scenario!(rejecting_missing_chef, "rejecting a create without a chef");
register_command_scenario!(deleting_newest, "deleting the newest recipe");
