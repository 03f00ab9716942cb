//! CLI definitions for VoiceChain.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VoiceChain CLI.
#[derive(Parser)]
#[command(name = "voicechain")]
#[command(about = "Guided voice-protection case workflow")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Case catalog commands
    Cases {
        #[command(subcommand)]
        action: CasesAction,
    },

    /// Show the scan report over the case catalog
    Report {
        /// Filter by category (action, monitor, review, all)
        #[arg(long)]
        category: Option<String>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Guided workflow commands (default: status)
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Show milestone progress of the selected cases
    Dashboard {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Run the simulated voice scan
    Scan {
        /// RNG seed for reproducible counters
        #[arg(long)]
        seed: Option<u64>,

        /// Record a voice sample for this many milliseconds first
        #[arg(long, default_value_t = 0)]
        record_ms: u64,

        /// Simulate refusing microphone access
        #[arg(long)]
        deny_microphone: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CasesAction {
    /// List cases in the catalog
    List {
        /// Filter by category (action, monitor, review, all)
        #[arg(long)]
        category: Option<String>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show detailed info about a case
    Show {
        /// Case ID
        case_id: String,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum WorkflowAction {
    /// Show the current step and selection
    Status {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Advance to the next step
    Next,

    /// Go back to the previous step
    Prev,

    /// Jump to a step by number or short label
    Goto {
        /// Step number (1-7) or label such as "report"
        #[arg(allow_negative_numbers = true)]
        step: String,
    },

    /// Select or deselect a case
    Toggle {
        /// Case ID
        case_id: String,
    },

    /// Select every listed case, or clear them when all are selected
    SelectAll {
        /// Restrict to one category (default: the workflow's case list)
        #[arg(long)]
        category: Option<String>,
    },

    /// Deselect all cases
    Clear,

    /// Forget all progress
    Reset,

    /// Finish the workflow at the final step
    Complete {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Validate the configuration file
    Check,

    /// Print the effective configuration
    Show,
}
