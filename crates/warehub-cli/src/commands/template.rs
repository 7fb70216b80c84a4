//! Template authoring commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use warehub_core::error::AppError;
use warehub_service::template::validate;

/// Arguments for template commands
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template subcommands
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Check a template body for unknown or malformed placeholders
    Validate {
        /// File containing the HTML body
        file: PathBuf,
        /// Subject line to check alongside the body
        #[arg(long)]
        subject: Option<String>,
    },
}

/// Execute template commands
pub async fn execute(args: &TemplateArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TemplateCommand::Validate { file, subject } => {
            let body = tokio::fs::read_to_string(file).await?;
            let mut parts = vec![body.as_str()];
            if let Some(subject) = subject.as_deref() {
                parts.push(subject);
            }
            let report = validate(&parts);

            if format == OutputFormat::Json {
                output::print_json(&report);
            } else if report.valid {
                output::print_success("Template is valid");
            } else {
                output::print_warning("Template has problems");
                for key in &report.unknown_placeholders {
                    output::print_kv("Unknown placeholder", key);
                }
                for fragment in &report.malformed {
                    output::print_kv("Malformed", fragment);
                }
            }

            if !report.valid {
                return Err(AppError::validation(format!(
                    "{} unknown and {} malformed placeholder(s) in {}",
                    report.unknown_placeholders.len(),
                    report.malformed.len(),
                    file.display()
                )));
            }
        }
    }

    Ok(())
}
