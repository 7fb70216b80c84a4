//! CLI command definitions and dispatch.

pub mod dispatch;
pub mod queue;
pub mod template;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use warehub_core::config::AppConfig;
use warehub_core::error::AppError;
use warehub_database::{DatabasePool, Stores};
use warehub_service::AlertDispatcher;

/// Warehub: alert dispatch for warehouse tenants
#[derive(Debug, Parser)]
#[command(name = "warehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file (without extension)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay to apply (`config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process pending alerts once
    Dispatch(dispatch::DispatchArgs),
    /// Send a diagnostic email
    TestSend(dispatch::TestSendArgs),
    /// Alert queue inspection
    Queue(queue::QueueArgs),
    /// Template authoring helpers
    Template(template::TemplateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Dispatch(args) => dispatch::execute(args, &self.load_config()?, self.format).await,
            Commands::TestSend(args) => dispatch::test_send(args, &self.load_config()?).await,
            Commands::Queue(args) => queue::execute(args, &self.load_config()?, self.format).await,
            Commands::Template(args) => template::execute(args, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: connect to the database and build the store set
pub async fn connect_stores(config: &AppConfig) -> Result<Stores, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(Stores::postgres(pool.into_pool()))
}

/// Helper: build a dispatcher backed by Postgres and the configured provider
pub async fn build_dispatcher(config: &AppConfig) -> Result<AlertDispatcher, AppError> {
    let stores = connect_stores(config).await?;
    let provider = warehub_mail::build_provider(&config.mail)?;
    Ok(AlertDispatcher::new(
        stores,
        provider,
        config.dispatch.clone(),
        &config.mail,
    ))
}
