// SQLite-backed destination store

use std::collections::HashMap;
use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use tedlink_recon::similarity::similarity;

use crate::error::StoreError;
use crate::store::{quote_identifier, validate_columns, validate_identifier, Store};

/// A store over one SQLite connection.
///
/// Writes run inside an explicit transaction that is opened lazily and closed by
/// [`Store::commit`]. Dropping the store (on any exit path) closes the connection, and
/// SQLite discards whatever was not committed.
pub struct SqliteStore {
    conn: Connection,
    insert_sql: HashMap<String, String>,
    similarity_fn: Option<String>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open `path` as an empty database, deleting any existing file first.
    pub fn create_fresh(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            insert_sql: HashMap::new(),
            similarity_fn: None,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    /// Uncommitted work is discarded.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    /// Column names of `table`, in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT 0", quote_identifier(table)))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    /// Every row of `table` as text, in insertion order. NULLs read back as empty strings.
    pub fn rows(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_identifier(table)))?;
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(value_text))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn begin_if_needed(&self) -> Result<(), StoreError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

/// Text form of any SQL value, as handed to the similarity function.
fn value_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

impl Store for SqliteStore {
    fn relation_exists(&self, table: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
                [table],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_relation(&mut self, table: &str, columns: &[String]) -> Result<(), StoreError> {
        validate_identifier(table)?;
        validate_columns(columns)?;
        if self.relation_exists(table)? {
            return Err(StoreError::SchemaConflict { table: table.into() });
        }

        let quoted: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
        let sql = format!("CREATE TABLE {} ({})", quote_identifier(table), quoted.join(", "));
        self.begin_if_needed()?;
        self.conn.execute_batch(&sql)?;
        self.commit()?;
        tracing::info!(sql = %sql, "created relation");

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            quoted.join(", "),
            placeholders.join(", "),
        );
        self.insert_sql.insert(table.to_string(), insert);
        Ok(())
    }

    fn insert_row(&mut self, table: &str, values: &[String]) -> Result<(), StoreError> {
        let sql = self
            .insert_sql
            .get(table)
            .ok_or_else(|| StoreError::UnknownRelation(table.to_string()))?;
        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare_cached(sql)?;
        stmt.execute(params_from_iter(values.iter()))?;
        Ok(())
    }

    fn register_similarity(&mut self, name: &str) -> Result<(), StoreError> {
        if self.similarity_fn.as_deref() == Some(name) {
            return Ok(());
        }
        self.conn.create_scalar_function(
            name,
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let a = value_text(ctx.get_raw(0));
                let b = value_text(ctx.get_raw(1));
                Ok(similarity(&a, &b))
            },
        )?;
        tracing::debug!(function = name, "registered similarity function");
        self.similarity_fn = Some(name.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &str) -> Result<(), StoreError> {
        self.begin_if_needed()?;
        self.conn.execute_batch(statement)?;
        Ok(())
    }

    fn row_count(&self, table: &str) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
