//! Derived-match building from an externally authored script.
//!
//! The script is data, not code this crate generates: a `;`-separated batch that is
//! expected to read the loaded relation, call the similarity function, and leave one
//! derived relation behind. Semicolons inside string literals are not supported.

use crate::error::StoreError;
use crate::store::Store;

/// Terminator between statements.
pub const STATEMENT_TERMINATOR: char = ';';

/// Split a script into `(index, statement)` pairs. Indices count every terminator-delimited
/// chunk, so blank chunks are skipped without shifting later indices.
pub fn split_statements(script: &str) -> impl Iterator<Item = (usize, &str)> {
    script
        .split(STATEMENT_TERMINATOR)
        .enumerate()
        .map(|(i, stmt)| (i, stmt.trim()))
        .filter(|(_, stmt)| !stmt.is_empty())
}

/// Run every statement of `script` in order, commit once, and return the row count of
/// `derived_table`.
///
/// The first failing statement aborts the run with its index; nothing from the script is
/// committed in that case.
pub fn build_matches<S>(store: &mut S, script: &str, derived_table: &str) -> Result<usize, StoreError>
where
    S: Store + ?Sized,
{
    let mut executed = 0usize;
    for (index, statement) in split_statements(script) {
        tracing::debug!(index, statement, "running match statement");
        store
            .execute(statement)
            .map_err(|e| StoreError::ScriptExecution {
                index,
                statement: statement.to_string(),
                source: Box::new(e),
            })?;
        executed += 1;
    }
    store.commit()?;

    let count = store.row_count(derived_table)?;
    tracing::info!(statements = executed, table = derived_table, count, "{derived_table} record count: {count}");
    Ok(count)
}
