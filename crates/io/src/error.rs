use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The destination relation already exists; the store must be cleared first.
    #[error("relation '{table}' already exists")]
    SchemaConflict { table: String },

    /// A data row's field count differs from the header's.
    /// `row` counts data rows from 1 (the header is row 0).
    #[error("row {row}: expected {expected} fields, found {found}")]
    MalformedRecord {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A statement of the match script failed. `index` is its 0-based position in the script.
    #[error("match script statement {index} failed: {source}")]
    ScriptExecution {
        index: usize,
        statement: String,
        #[source]
        source: Box<StoreError>,
    },

    #[error("invalid column name {column:?}: {reason}")]
    InvalidColumnName { column: String, reason: &'static str },

    #[error("input has no header row")]
    EmptyStream,

    #[error("relation '{0}' has not been created")]
    UnknownRelation(String),

    #[error("load config error: {0}")]
    Config(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
