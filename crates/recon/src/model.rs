use std::sync::Arc;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row from a source, keyed by that source's header.
///
/// Rows from the same source share their header. A short row simply has no value for the
/// trailing fields, which is different from an empty value.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl SourceRecord {
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Value of `field`, or `None` if the header lacks it or this row stops short of it.
    /// Duplicate header names resolve to the last occurrence.
    pub fn get(&self, field: &str) -> Option<&str> {
        let idx = self.headers.iter().rposition(|h| h == field)?;
        self.values.get(idx).map(String::as_str)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One reconciled output row. `values` lines up with `MergeOutput::columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub key: String,
    pub in_primary: bool,
    pub in_secondary: bool,
    pub values: Vec<String>,
}

/// Counts observed while cross-referencing. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub primary_records: usize,
    pub secondary_records: usize,
    pub primary_keys: usize,
    pub secondary_keys: usize,
    pub matched: usize,
    pub primary_only: usize,
    pub secondary_only: usize,
    /// Earlier records replaced by a later record with the same key.
    pub duplicates_primary: usize,
    pub duplicates_secondary: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub columns: Vec<String>,
    pub rows: Vec<MergedRow>,
    pub stats: MergeStats,
}

impl MergeOutput {
    /// Value of `column` in `row`, if the column exists.
    pub fn value<'a>(&self, row: &'a MergedRow, column: &str) -> Option<&'a str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        row.values.get(idx).map(String::as_str)
    }
}
