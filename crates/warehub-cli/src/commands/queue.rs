//! Alert queue inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use warehub_core::config::AppConfig;
use warehub_core::error::AppError;

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Show alert counts per status
    Status {
        /// Restrict to one tenant
        #[arg(long)]
        tenant_id: Option<Uuid>,
    },
}

/// One row of the status table
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    /// Alert status
    status: String,
    /// Number of alerts
    count: i64,
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect_stores(config).await?;

    match &args.command {
        QueueCommand::Status { tenant_id } => {
            let rows: Vec<StatusRow> = stores
                .alerts
                .count_by_status(*tenant_id)
                .await?
                .into_iter()
                .map(|(status, count)| StatusRow {
                    status: status.to_string(),
                    count,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
