use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pii-redact")]
#[command(about = "Detect and redact PII in JSON field maps inside CSV records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: user config directory)
    #[arg(long, global = true, env = "PII_REDACT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a CSV file with record_id and data_json columns
    Redact {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long, default_value = "redacted_output.csv")]
        output: PathBuf,

        /// Only run standalone recognizers on their known field names
        #[arg(long)]
        keyed: bool,
    },

    /// Classify and redact a single JSON object, printing the result
    Classify {
        /// JSON object, e.g. '{"name": "John Doe", "phone": "9876543210"}'
        json: String,

        /// Record id to report
        #[arg(long, default_value = "cli")]
        id: String,

        /// Only run standalone recognizers on their known field names
        #[arg(long)]
        keyed: bool,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}
