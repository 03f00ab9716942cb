//! VoiceChain - guided voice-protection case workflow.
//!
//! Main entry point for the VoiceChain CLI.

mod app;
mod cli;
mod cmd_cases;
mod cmd_config;
mod cmd_dashboard;
mod cmd_scan;
mod cmd_workflow;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voicechain_config::{default_data_dir, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands, WorkflowAction};
use crate::cmd_cases::{handle_cases_command, handle_report_command};
use crate::cmd_config::handle_config_command;
use crate::cmd_dashboard::handle_dashboard_command;
use crate::cmd_scan::handle_scan_command;
use crate::cmd_workflow::handle_workflow_command;

/// Initialize tracing with console output and, if enabled, daily log files.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = if logging.file {
        let log_dir = default_data_dir().join("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("voicechain")
            .filename_suffix("log")
            .max_log_files(14)
            .build(&log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keep the writer alive for the program duration.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console on stderr so command output stays clean
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;
    debug!("Loaded config from {}", cli.config.display());

    // `config check` reports problems itself.
    if !matches!(cli.command, Some(Commands::Config { .. })) {
        let warnings = ConfigValidator::validate(&config).into_result()?;
        for warning in warnings {
            warn!("Config {}: {}", warning.path, warning.message);
        }
    }

    match cli.command {
        None => {
            let action = WorkflowAction::Status {
                format: "table".to_string(),
            };
            handle_workflow_command(action, &config).await
        }
        Some(Commands::Cases { action }) => handle_cases_command(action, &config).await,
        Some(Commands::Report { category, format }) => {
            handle_report_command(&config, category.as_deref(), &format).await
        }
        Some(Commands::Workflow { action }) => handle_workflow_command(action, &config).await,
        Some(Commands::Dashboard { format }) => handle_dashboard_command(&config, &format).await,
        Some(Commands::Scan {
            seed,
            record_ms,
            deny_microphone,
        }) => handle_scan_command(&config, seed, record_ms, deny_microphone).await,
        Some(Commands::Config { action }) => handle_config_command(action, &config, &cli.config),
    }
}
