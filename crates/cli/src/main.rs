// tedlink CLI - TED/YouTube reconciliation and SQLite loading, headless
// Exit codes are registered in exit_codes.rs

mod exit_codes;
mod join;
mod load;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tedlink_io::StoreError;
use tedlink_recon::ReconError;

use exit_codes::{recon_exit_code, store_exit_code, EXIT_IO, EXIT_SUCCESS};
use settings::Settings;

#[derive(Parser)]
#[command(name = "tedlink")]
#[command(about = "Join TED and YouTube talk listings, then load and fuzzy-match speakers in SQLite")]
#[command(version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-reference two CSV sources by normalized key and write one merged CSV
    #[command(after_help = "\
Examples:
  tedlink join --ted ted.csv --yt youtube.csv > merged.csv
  tedlink join -t ted.csv -y youtube.csv -o merged.csv
  tedlink join --primary talks.csv --secondary videos.csv --config tedlink.toml")]
    Join {
        /// Primary (authoritative) CSV source
        #[arg(long, short = 't', visible_alias = "ted")]
        primary: PathBuf,

        /// Secondary (fallback) CSV source
        #[arg(long, short = 'y', visible_alias = "yt")]
        secondary: PathBuf,

        /// Write the merged CSV here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// TOML config with [join] source and column mappings
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Load a merged CSV into SQLite and optionally run a match script
    #[command(after_help = "\
Examples:
  tedlink load --db talks.db --input merged.csv --script matching_speakers.sql
  tedlink join -t ted.csv -y youtube.csv | tedlink load --db talks.db --replace")]
    Load {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,

        /// Merged CSV to load (reads stdin when omitted)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// SQL script run after loading; statements separated by ';'
        #[arg(long, short = 's')]
        script: Option<PathBuf>,

        /// Delete the database file before loading
        #[arg(long)]
        replace: bool,

        /// TOML config with a [load] section
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Print the normalized edit-distance score between two strings
    #[command(after_help = "\
Examples:
  tedlink similarity 'Ann Smith' 'Anne Smith'    # 0.1")]
    Similarity {
        a: String,
        b: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Join { primary, secondary, output, config } => {
            Settings::load(config.as_deref())
                .and_then(|settings| join::cmd_join(primary, secondary, output, &settings))
        }
        Commands::Load { db, input, script, replace, config } => {
            Settings::load(config.as_deref())
                .and_then(|settings| load::cmd_load(db, input, script, replace, &settings))
        }
        Commands::Similarity { a, b } => cmd_similarity(&a, &b),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_similarity(a: &str, b: &str) -> Result<(), CliError> {
    use std::io::Write;

    let score = tedlink_recon::similarity(a, b);
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", score).map_err(|e| CliError::io(e.to_string()))
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Create error from a join failure with its registered exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::MissingKeyField { key_field, .. } => {
                Some(format!("every row needs a value in '{}'; check the header or [join] key_field", key_field))
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Create error from a store failure with its registered exit code.
    pub fn store(err: StoreError) -> Self {
        let code = store_exit_code(&err);
        let hint = match &err {
            StoreError::SchemaConflict { .. } => Some("rerun with --replace to start from an empty database".to_string()),
            StoreError::ScriptExecution { .. } => {
                Some("loaded rows are kept; fix the statement and rerun the script".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
