mod database_settings;
mod http_api_settings;

pub use database_settings::DatabaseSettings;
pub use http_api_settings::{HttpApiSettings, HttpServerSettings};

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use strum::VariantNames;
use strum_macros::{Display, EnumString, EnumVariantNames};
use thiserror::Error;

const RESOURCES_DIR: &str = "./resources";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unrecognized environment {0:?}, expected one of {:?}", Environment::VARIANTS)]
    UnrecognizedEnvironment(String),
}

#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, EnumString, EnumVariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Debug, Default, Parser)]
#[command(version, about = "HTTP service recording weather observations")]
pub struct CliOptions {
    /// Explicit configuration file applied over the layered resources.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Secrets configuration file, kept apart from the shareable layers.
    #[arg(long, value_name = "PATH")]
    pub secrets: Option<PathBuf>,

    /// Environment to run under; beats the APP_ENVIRONMENT variable.
    #[arg(short, long)]
    pub environment: Option<Environment>,

    /// Directory holding the layered resource files.
    #[arg(short, long, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Apply pending database migrations before serving.
    #[arg(long)]
    pub migrate: bool,
}

impl CliOptions {
    pub const fn env_app_environment() -> &'static str {
        "APP_ENVIRONMENT"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: HttpApiSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    // layered load, later sources winning: base, environment file,
    // --config, --secrets, then APP_* variables (__ separating nested fields)
    #[tracing::instrument(level = "info")]
    pub fn load(options: &CliOptions) -> Result<Self, SettingsError> {
        let resources = options.resources.clone().unwrap_or_else(|| PathBuf::from(RESOURCES_DIR));
        let environment = match options.environment {
            Some(environment) => Some(environment),
            None => environment_from_var()?,
        };

        let mut builder = config::Config::builder()
            .add_source(config::File::from(resources.join("base")).required(true));

        if let Some(environment) = environment {
            let layer = resources.join(environment.to_string());
            builder = builder.add_source(config::File::from(layer).required(false));
        }

        if let Some(config_file) = &options.config {
            builder = builder.add_source(config::File::from(config_file.clone()).required(true));
        }

        if let Some(secrets_file) = &options.secrets {
            builder = builder.add_source(config::File::from(secrets_file.clone()).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize()?;
        tracing::debug!(?settings, "loaded configuration");
        Ok(settings)
    }
}

fn environment_from_var() -> Result<Option<Environment>, SettingsError> {
    match std::env::var(CliOptions::env_app_environment()) {
        Ok(value) => {
            let environment = value
                .parse::<Environment>()
                .map_err(|_| SettingsError::UnrecognizedEnvironment(value.clone()))?;
            Ok(Some(environment))
        },
        Err(_) => Ok(None),
    }
}
