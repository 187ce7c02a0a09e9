//! `tedlink load` — stream a merged CSV into SQLite, then build derived matches.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use tedlink_io::csv::read_rows;
use tedlink_io::{build_matches, load, SqliteStore};

use crate::exit_codes::EXIT_IO;
use crate::settings::Settings;
use crate::CliError;

pub fn cmd_load(
    db: PathBuf,
    input: Option<PathBuf>,
    script: Option<PathBuf>,
    replace: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let config = &settings.load;

    // Read the script up front so a bad path fails before anything is written.
    let script = script
        .map(|path| {
            std::fs::read_to_string(&path)
                .map(|sql| (path.clone(), sql))
                .map_err(|e| CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display())))
        })
        .transpose()?;

    let mut store = if replace {
        SqliteStore::create_fresh(&db)
    } else {
        SqliteStore::open(&db)
    }
    .map_err(CliError::store)?;

    let report = match input {
        Some(path) => {
            let file = File::open(&path).map_err(|e| {
                CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display()))
            })?;
            load(&mut store, read_rows(BufReader::new(file)), config)
        }
        None => load(&mut store, read_rows(io::stdin().lock()), config),
    }
    .map_err(CliError::store)?;
    tracing::debug!(columns = ?report.columns, "loaded {} rows into {}", report.inserted, report.table);

    if let Some((path, sql)) = script {
        tracing::info!("Running {}", path.display());
        build_matches(&mut store, &sql, &config.derived_table).map_err(CliError::store)?;
    }

    store.close().map_err(CliError::store)?;
    Ok(())
}
