//! Configuration for the `create` subcommand.
//!
//! Every field can come from the command line, a configuration file, or a
//! `RECETARIO_CMDS_CREATE_*` environment variable, so a chef can keep their
//! `chef_id` out of every invocation.

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use recetario_core::{ChefId, NewRecipe};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CHEF_ID, ARG_DESCRIPTION, ARG_TITLE, CliError, ENV_CREATE_CHEF_ID,
    ENV_CREATE_DESCRIPTION, ENV_CREATE_TITLE, split_ingredients,
};

/// CLI arguments for the `create` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "create",
    long_about = "Create a recipe. When an image is given it is uploaded \
                 first and the recipe stores its public URL.",
    about = "Create a recipe"
)]
#[ortho_config(prefix = "RECETARIO")]
pub(crate) struct CreateArgs {
    /// Display title.
    #[arg(long = ARG_TITLE, value_name = "text")]
    #[serde(default)]
    pub(crate) title: Option<String>,
    /// Free-form description.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Comma-separated ingredient list, e.g. "tomato,basil".
    #[arg(long = "ingredients", value_name = "list")]
    #[serde(default)]
    pub(crate) ingredients: Option<String>,
    /// Identifier of the authoring chef.
    #[arg(long = ARG_CHEF_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) chef_id: Option<String>,
    /// Photo to upload: a local path, `file://` URI or URL.
    #[arg(long = "image", value_name = "image")]
    #[serde(default)]
    pub(crate) image: Option<String>,
}

impl CreateArgs {
    pub(crate) fn into_config(self) -> Result<CreateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CreateConfig::try_from(merged)
    }
}

/// Resolved `create` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreateConfig {
    /// Validated recipe fields.
    pub(crate) recipe: NewRecipe,
    /// Photo to upload before inserting.
    pub(crate) image: Option<String>,
}

impl TryFrom<CreateArgs> for CreateConfig {
    type Error = CliError;

    fn try_from(args: CreateArgs) -> Result<Self, Self::Error> {
        let title = args.title.ok_or(CliError::MissingArgument {
            field: ARG_TITLE,
            env: ENV_CREATE_TITLE,
        })?;
        let description = args.description.ok_or(CliError::MissingArgument {
            field: ARG_DESCRIPTION,
            env: ENV_CREATE_DESCRIPTION,
        })?;
        let chef_id = args.chef_id.ok_or(CliError::MissingArgument {
            field: ARG_CHEF_ID,
            env: ENV_CREATE_CHEF_ID,
        })?;
        let ingredients = args.ingredients.unwrap_or_default();
        let recipe = NewRecipe::new(
            &title,
            &description,
            split_ingredients(&ingredients),
            ChefId::new(chef_id),
        )?;
        Ok(Self {
            recipe,
            image: args.image.filter(|image| !image.trim().is_empty()),
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CreateConfig, CliError> {
    let merged = CreateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    CreateConfig::try_from(merged)
}
