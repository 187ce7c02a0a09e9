use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (missing column mapping, duplicate output column, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A source record has no value at all for its designated key field.
    /// An empty value is a valid key; only an absent field is an error.
    #[error("source '{role}', row {row}: missing key field '{key_field}'")]
    MissingKeyField {
        role: String,
        key_field: String,
        row: usize,
    },
    /// CSV decode error while reading a source.
    #[error("source '{role}': {message}")]
    Csv { role: String, message: String },
}
