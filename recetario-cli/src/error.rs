//! Error types emitted by the Recetario CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`; large payloads are boxed.

use std::sync::Arc;

use recetario_core::{RecipeDraftError, RecipeError};
use recetario_data::BackendBuildError;
use thiserror::Error;

/// Errors emitted by the Recetario CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The recipe fields failed validation.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(#[from] RecipeDraftError),
    /// The backend client could not be built from the connection settings.
    #[error("failed to configure backend: {0}")]
    Backend(#[from] BackendBuildError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The backend failed or rejected the operation.
    #[error(transparent)]
    Recipe(Box<RecipeError>),
    /// The command result could not be encoded as JSON.
    #[error("failed to serialise command output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command result failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<RecipeError> for CliError {
    fn from(error: RecipeError) -> Self {
        Self::Recipe(Box::new(error))
    }
}
