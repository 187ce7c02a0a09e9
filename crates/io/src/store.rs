//! Destination store boundary.
//!
//! The loader and the match builder only talk to a [`Store`]; the relation's shape is
//! whatever column list the input header carries, so nothing here assumes a fixed schema.

use std::collections::HashSet;

use crate::error::StoreError;

pub trait Store {
    /// Whether a relation named `table` already exists.
    fn relation_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// Create `table` with the given untyped columns. Fails with
    /// [`StoreError::SchemaConflict`] if it already exists.
    fn create_relation(&mut self, table: &str, columns: &[String]) -> Result<(), StoreError>;

    /// Insert one row, binding `values` positionally in column order.
    fn insert_row(&mut self, table: &str, values: &[String]) -> Result<(), StoreError>;

    /// Make the similarity score callable from query text as `name(a, b)`.
    fn register_similarity(&mut self, name: &str) -> Result<(), StoreError>;

    /// Durably flush everything written since the last commit.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Run one arbitrary statement.
    fn execute(&mut self, statement: &str) -> Result<(), StoreError>;

    fn row_count(&self, table: &str) -> Result<usize, StoreError>;
}

/// Quote a name as an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Check a single relation or column name before it is used as an identifier.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let reason = if name.trim().is_empty() {
        "name is empty"
    } else if name.contains('\0') {
        "name contains NUL"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidColumnName {
        column: name.to_string(),
        reason,
    })
}

/// Check a header before it defines a relation. Names are compared ASCII case-insensitively,
/// since that is how the store resolves identifiers.
pub fn validate_columns(columns: &[String]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for column in columns {
        validate_identifier(column)?;
        if !seen.insert(column.to_ascii_lowercase()) {
            return Err(StoreError::InvalidColumnName {
                column: column.clone(),
                reason: "duplicate column",
            });
        }
    }
    Ok(())
}
