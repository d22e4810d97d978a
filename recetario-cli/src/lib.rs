//! Command-line front end for the Recetario recipe backend.
#![forbid(unsafe_code)]

use clap::{Args, Parser, Subcommand};
use recetario_data::SupabaseConfig;

mod create;
mod error;
mod recipes;

pub use error::CliError;

use create::CreateArgs;
use recipes::{SupabaseStoreBuilder, run_command_with};

const ARG_SUPABASE_URL: &str = "supabase-url";
const ARG_ANON_KEY: &str = "anon-key";
const ARG_TITLE: &str = "title";
const ARG_DESCRIPTION: &str = "description";
const ARG_CHEF_ID: &str = "chef-id";
const ENV_SUPABASE_URL: &str = "RECETARIO_SUPABASE_URL";
const ENV_ANON_KEY: &str = "RECETARIO_ANON_KEY";
const ENV_ACCESS_TOKEN: &str = "RECETARIO_ACCESS_TOKEN";
const ENV_TABLE: &str = "RECETARIO_TABLE";
const ENV_BUCKET: &str = "RECETARIO_BUCKET";
const ENV_CREATE_TITLE: &str = "RECETARIO_CMDS_CREATE_TITLE";
const ENV_CREATE_DESCRIPTION: &str = "RECETARIO_CMDS_CREATE_DESCRIPTION";
const ENV_CREATE_CHEF_ID: &str = "RECETARIO_CMDS_CREATE_CHEF_ID";

/// Run the Recetario CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when the
/// backend cannot be reached or rejects the request, or when the result
/// cannot be written to standard output.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let builder = SupabaseStoreBuilder;
    let mut stdout = std::io::stdout().lock();
    run_command_with(cli.command, cli.connection, &builder, &mut stdout)
}

#[derive(Debug, Parser)]
#[command(
    name = "recetario",
    about = "Browse and edit the Recetario recipe collection",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every recipe, newest first.
    List,
    /// List recipes that use an ingredient.
    Search {
        /// Ingredient to look for; case is ignored.
        #[arg(value_name = "ingredient")]
        ingredient: String,
    },
    /// Create a recipe, optionally with a photo.
    Create(CreateArgs),
    /// Replace a recipe's text fields and, optionally, its photo.
    Update(UpdateArgs),
    /// Delete a recipe. Its photo stays in the bucket.
    Delete {
        /// Identifier of the recipe to delete.
        #[arg(value_name = "id")]
        id: String,
    },
    /// Upload a photo and print its public URL.
    Upload {
        /// Local path, `file://` URI or URL of the photo.
        #[arg(value_name = "image")]
        image: String,
    },
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
struct ConnectionArgs {
    /// Base URL of the backend project.
    #[arg(long = ARG_SUPABASE_URL, env = ENV_SUPABASE_URL, value_name = "url", global = true)]
    supabase_url: Option<String>,
    /// Public API key sent with every request.
    #[arg(
        long = ARG_ANON_KEY,
        env = ENV_ANON_KEY,
        value_name = "key",
        global = true,
        hide_env_values = true
    )]
    anon_key: Option<String>,
    /// Signed-in user's access token; defaults to the anon key.
    #[arg(
        long = "access-token",
        env = ENV_ACCESS_TOKEN,
        value_name = "jwt",
        global = true,
        hide_env_values = true
    )]
    access_token: Option<String>,
    /// Table holding the recipe rows.
    #[arg(long = "table", env = ENV_TABLE, value_name = "name", global = true)]
    table: Option<String>,
    /// Bucket holding recipe photos.
    #[arg(long = "bucket", env = ENV_BUCKET, value_name = "name", global = true)]
    bucket: Option<String>,
}

impl TryFrom<ConnectionArgs> for SupabaseConfig {
    type Error = CliError;

    fn try_from(args: ConnectionArgs) -> Result<Self, Self::Error> {
        let base_url = args.supabase_url.ok_or(CliError::MissingArgument {
            field: ARG_SUPABASE_URL,
            env: ENV_SUPABASE_URL,
        })?;
        let anon_key = args.anon_key.ok_or(CliError::MissingArgument {
            field: ARG_ANON_KEY,
            env: ENV_ANON_KEY,
        })?;
        let mut config = Self::new(base_url, anon_key);
        if let Some(token) = args.access_token {
            config = config.with_access_token(token);
        }
        if let Some(table) = args.table {
            config = config.with_table(table);
        }
        if let Some(bucket) = args.bucket {
            config = config.with_bucket(bucket);
        }
        Ok(config)
    }
}

/// Arguments for the `update` subcommand.
#[derive(Debug, Clone, Args)]
struct UpdateArgs {
    /// Identifier of the recipe to change.
    #[arg(value_name = "id")]
    id: String,
    /// Replacement title.
    #[arg(long = ARG_TITLE, value_name = "text")]
    title: String,
    /// Replacement description.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    description: String,
    /// Comma-separated replacement ingredients.
    #[arg(long = "ingredients", value_name = "list", default_value = "")]
    ingredients: String,
    /// New photo; the current one is kept when omitted.
    #[arg(long = "image", value_name = "image")]
    image: Option<String>,
}

/// Split a comma-separated ingredient list.
///
/// Normalisation (trimming, lowercasing, dropping blanks) happens when the
/// recipe draft is built.
fn split_ingredients(list: &str) -> Vec<&str> {
    list.split(',').collect()
}

#[cfg(test)]
mod tests;
