//! `--config` file: one TOML document with a `[join]` and a `[load]` section.
//! Either section may be omitted; the built-in TED/YouTube defaults fill in.

use std::path::Path;

use serde::Deserialize;
use tedlink_io::LoadConfig;
use tedlink_recon::JoinConfig;

use crate::exit_codes::{EXIT_CONFIG, EXIT_IO};
use crate::CliError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub join: JoinConfig,
    pub load: LoadConfig,
}

impl Settings {
    pub fn from_toml(input: &str) -> Result<Self, CliError> {
        let settings: Settings = toml::from_str(input)
            .map_err(|e| CliError::new(EXIT_CONFIG, format!("config parse error: {e}")))?;
        settings.join.validate().map_err(CliError::recon)?;
        settings.load.validate().map_err(CliError::store)?;
        Ok(settings)
    }

    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display()))
                })?;
                Self::from_toml(&text)
            }
        }
    }
}
