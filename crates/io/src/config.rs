use serde::Deserialize;

use crate::error::StoreError;

/// Rows inserted between commits.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Where and how a merged stream is loaded, and where the match script leaves its result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub table: String,
    pub batch_size: usize,
    /// Name under which the similarity score is callable from SQL.
    pub similarity_function: String,
    /// Relation the match script is expected to create.
    pub derived_table: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            table: "ted".into(),
            batch_size: DEFAULT_BATCH_SIZE,
            similarity_function: "edist".into(),
            derived_table: "matching_speakers".into(),
        }
    }
}

impl LoadConfig {
    pub fn from_toml(input: &str) -> Result<Self, StoreError> {
        let config: LoadConfig =
            toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.batch_size == 0 {
            return Err(StoreError::Config("batch_size must be at least 1".into()));
        }
        for (field, value) in [
            ("table", &self.table),
            ("similarity_function", &self.similarity_function),
            ("derived_table", &self.derived_table),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::Config(format!("{field} must not be empty")));
            }
        }
        // Bare word only.
        if !self
            .similarity_function
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::Config(format!(
                "similarity_function '{}' must be alphanumeric or '_'",
                self.similarity_function
            )));
        }
        Ok(())
    }
}
