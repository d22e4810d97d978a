//! Recipe subcommands: resolve settings, call the store, print JSON.

use std::io::Write;

use recetario_core::{Recipe, RecipeEdit, RecipeId, RecipeStore};
use recetario_data::SupabaseConfig;
use serde::Serialize;

use crate::create::CreateConfig;
use crate::{CliError, Command, ConnectionArgs, UpdateArgs, split_ingredients};

/// Builds the recipe store for the current invocation.
pub(crate) trait StoreBuilder {
    fn build(&self, config: SupabaseConfig) -> Result<RecipeStore, CliError>;
}

/// Connects to the configured backend over HTTP.
pub(crate) struct SupabaseStoreBuilder;

impl StoreBuilder for SupabaseStoreBuilder {
    fn build(&self, config: SupabaseConfig) -> Result<RecipeStore, CliError> {
        log::debug!("connecting to {}", config.base_url);
        Ok(recetario_data::connect(config)?)
    }
}

/// What a subcommand prints on success.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum CommandOutput {
    Recipes(Vec<Recipe>),
    Recipe(Box<Recipe>),
    Deleted { deleted: RecipeId },
    Uploaded { url: String },
}

/// A subcommand with its settings resolved and validated.
#[derive(Debug)]
enum Operation {
    List,
    Search(String),
    Create(CreateConfig),
    Update {
        id: RecipeId,
        edit: RecipeEdit,
        image: Option<String>,
    },
    Delete(RecipeId),
    Upload(String),
}

impl Operation {
    fn resolve(command: Command) -> Result<Self, CliError> {
        Ok(match command {
            Command::List => Self::List,
            Command::Search { ingredient } => Self::Search(ingredient),
            Command::Create(args) => Self::Create(args.into_config()?),
            Command::Update(args) => resolve_update(args)?,
            Command::Delete { id } => Self::Delete(RecipeId::new(id)),
            Command::Upload { image } => Self::Upload(image),
        })
    }

    async fn execute(self, store: &RecipeStore) -> Result<CommandOutput, CliError> {
        let output = match self {
            Self::List => CommandOutput::Recipes(store.list().await?),
            Self::Search(token) => {
                CommandOutput::Recipes(store.search_by_ingredient(&token).await?)
            }
            Self::Create(config) => {
                let created = store.create(config.recipe, config.image.as_deref()).await?;
                log::info!("created recipe {}", created.id);
                CommandOutput::Recipe(Box::new(created))
            }
            Self::Update { id, edit, image } => {
                let updated = store.update(&id, edit, image.as_deref()).await?;
                CommandOutput::Recipe(Box::new(updated))
            }
            Self::Delete(id) => {
                store.delete(&id).await?;
                CommandOutput::Deleted { deleted: id }
            }
            Self::Upload(image) => CommandOutput::Uploaded {
                url: store.upload_image(&image).await?,
            },
        };
        Ok(output)
    }
}

fn resolve_update(args: UpdateArgs) -> Result<Operation, CliError> {
    let edit = RecipeEdit::new(
        &args.title,
        &args.description,
        split_ingredients(&args.ingredients),
    )?;
    Ok(Operation::Update {
        id: RecipeId::new(args.id),
        edit,
        image: args.image.filter(|image| !image.trim().is_empty()),
    })
}

/// Run `command` against the store produced by `builder`, writing the JSON
/// result to `writer`.
///
/// Command settings are validated before any connection is attempted.
pub(crate) fn run_command_with(
    command: Command,
    connection: ConnectionArgs,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let operation = Operation::resolve(command)?;
    let config = SupabaseConfig::try_from(connection)?;
    let store = builder.build(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let output = runtime.block_on(operation.execute(&store))?;
    write_output(writer, &output)
}

fn write_output(writer: &mut dyn Write, output: &CommandOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
