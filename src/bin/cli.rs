//! Burner Checker CLI
//!
//! Analyze phone numbers and manage the local analysis history.

use std::path::PathBuf;

use burner_checker::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, report},
    services::{Analyzer, Columns, ReferenceIndex},
    storage::{HistoryStorage, LocalStorage},
};
use clap::{Parser, Subcommand};

/// Burner Checker - phone line classification
#[derive(Parser, Debug)]
#[command(
    name = "burner-checker",
    version,
    about = "Classify phone numbers as burner (VoIP) or carrier-issued lines"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "burner.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a phone number
    Analyze {
        /// Phone number in any formatting
        phone: String,

        /// Do not record the result in history
        #[arg(long)]
        no_save: bool,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show analysis history
    History {
        /// Print history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one history entry by position
    Delete {
        /// Zero-based position as shown by `history`
        index: usize,
    },

    /// Delete all history entries
    Clear,

    /// Validate configuration and reference table
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    let storage = LocalStorage::new(&config.history.path);

    match cli.command {
        Command::Analyze {
            phone,
            no_save,
            json,
        } => {
            config.validate()?;
            let analyzer = Analyzer::from_config(&config).await?;
            let history: Option<&dyn HistoryStorage> =
                if no_save { None } else { Some(&storage) };

            let verdict = pipeline::run_analysis(&analyzer, history, &phone).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                print!("{}", report::render_verdict(&verdict));
            }
        }

        Command::History { json } => {
            let history = storage.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                print!("{}", report::render_history(&history));
            }
        }

        Command::Delete { index } => {
            let removed = storage.delete(index).await?;
            println!("Deleted entry {} ({})", index, removed.phone);
        }

        Command::Clear => {
            let removed = storage.clear().await?;
            println!("Cleared {} entries", removed);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let columns = Columns::from_config(&config.reference);
            let index = ReferenceIndex::load(&config.reference.path, &columns).await?;
            if index.is_empty() {
                return Err(AppError::validation(format!(
                    "Reference table {} has no usable rows",
                    config.reference.path.display()
                )));
            }
            log::info!("✓ Reference table OK ({} exchange keys)", index.len());

            if config.authority.credentials().is_none() {
                log::warn!(
                    "Authority credentials missing; analyses will use the reference table only"
                );
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
