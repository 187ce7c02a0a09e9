//! `tedlink join` — cross-reference two CSV sources and write the merged CSV.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tedlink_io::csv::{read_file_as_utf8, write_merged};
use tedlink_recon::{load_records, merge, SourceRecord};

use crate::exit_codes::EXIT_IO;
use crate::settings::Settings;
use crate::CliError;

pub fn cmd_join(
    primary: PathBuf,
    secondary: PathBuf,
    output: Option<PathBuf>,
    settings: &Settings,
) -> Result<(), CliError> {
    let config = &settings.join;
    let primary_records = read_source(&config.primary.name, &primary)?;
    let secondary_records = read_source(&config.secondary.name, &secondary)?;

    let merged = merge(config, &primary_records, &secondary_records).map_err(CliError::recon)?;

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display()))
            })?;
            write_merged(BufWriter::new(file), &merged).map_err(CliError::store)?;
            tracing::info!(rows = merged.rows.len(), "wrote {}", path.display());
        }
        None => {
            write_merged(io::stdout().lock(), &merged).map_err(CliError::store)?;
        }
    }

    Ok(())
}

fn read_source(name: &str, path: &Path) -> Result<Vec<SourceRecord>, CliError> {
    tracing::info!("Reading {}", path.display());
    let content = read_file_as_utf8(path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display())))?;
    let records = load_records(name, content.as_bytes()).map_err(CliError::recon)?;
    tracing::info!("Found {} records in {}", records.len(), path.display());
    Ok(records)
}
