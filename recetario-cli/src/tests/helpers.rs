//! Test helpers wiring CLI commands to in-memory backends.

use super::*;
use crate::recipes::StoreBuilder;
use recetario_core::RecipeStore;
use recetario_core::test_support::{MemoryBlobStore, MemoryCollection, MemoryResources};
use std::cell::RefCell;

pub(super) const PHOTO_PATH: &str = "/photos/pasta.jpg";

/// Hands out stores that share one set of in-memory backends.
#[derive(Debug, Default)]
pub(super) struct StubStoreBuilder {
    pub(super) collection: MemoryCollection,
    pub(super) blobs: MemoryBlobStore,
    pub(super) resources: MemoryResources,
    pub(super) configs: RefCell<Vec<SupabaseConfig>>,
}

impl StubStoreBuilder {
    pub(super) fn new() -> Self {
        Self {
            resources: MemoryResources::default().with_file(PHOTO_PATH, b"jpeg bytes"),
            ..Self::default()
        }
    }
}

impl StoreBuilder for StubStoreBuilder {
    fn build(&self, config: SupabaseConfig) -> Result<RecipeStore, CliError> {
        self.configs.borrow_mut().push(config);
        Ok(RecipeStore::new(
            self.collection.clone(),
            self.blobs.clone(),
            self.resources.clone(),
        ))
    }
}

/// Parse `args` as if typed after `recetario --supabase-url .. --anon-key ..`.
pub(super) fn parse(args: &[&str]) -> Result<Cli, CliError> {
    let mut argv = vec![
        "recetario",
        "--supabase-url",
        "https://abc.supabase.co",
        "--anon-key",
        "anon",
    ];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).map_err(CliError::ArgumentParsing)
}

/// Parse and run `args`, returning captured stdout.
pub(super) fn run_with_stub(builder: &StubStoreBuilder, args: &[&str]) -> Result<String, CliError> {
    let cli = parse(args)?;
    let mut stdout = Vec::new();
    run_command_with(cli.command, cli.connection, builder, &mut stdout)?;
    Ok(String::from_utf8(stdout).expect("stdout utf-8"))
}
