//! Dispatch and test-send commands.

use clap::Args;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use warehub_core::config::AppConfig;
use warehub_core::error::AppError;
use warehub_service::DispatchRequest;

/// Arguments for a one-off dispatch run
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Only process alerts of this tenant
    #[arg(long)]
    pub tenant_id: Option<Uuid>,
    /// Only process this alert
    #[arg(long)]
    pub alert_id: Option<Uuid>,
    /// Maximum alerts to process
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for a diagnostic send
#[derive(Debug, Args)]
pub struct TestSendArgs {
    /// Recipient address
    #[arg(long)]
    pub to: String,
    /// Tenant whose branding is used
    #[arg(long)]
    pub tenant_id: Option<Uuid>,
}

/// Execute a single dispatch batch
pub async fn execute(
    args: &DispatchArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let dispatcher = super::build_dispatcher(config).await?;
    let summary = dispatcher
        .run_batch(&DispatchRequest {
            tenant_id: args.tenant_id,
            alert_id: args.alert_id,
            limit: args.limit,
        })
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Table => {
            println!("{}", summary.message);
            output::print_kv("Processed", &summary.processed.to_string());
            output::print_kv("Sent", &summary.sent.to_string());
            output::print_kv("Failed", &summary.failed.to_string());
            output::print_kv("Skipped", &summary.skipped.to_string());
        }
    }
    Ok(())
}

/// Send a diagnostic email
pub async fn test_send(args: &TestSendArgs, config: &AppConfig) -> Result<(), AppError> {
    let dispatcher = super::build_dispatcher(config).await?;
    let message = dispatcher.send_test(args.tenant_id, &args.to).await?;
    output::print_success(&message);
    Ok(())
}
