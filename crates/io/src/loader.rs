use crate::config::LoadConfig;
use crate::error::StoreError;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub columns: Vec<String>,
    pub inserted: usize,
}

/// Stream rows into a new relation.
///
/// The first row names the columns. Each later row is inserted as-is, with a commit every
/// `batch_size` rows and once at the end. The similarity function is registered before the
/// relation is created so any later query on this store can call it.
///
/// A row whose width differs from the header aborts the load; rows since the last commit
/// are left uncommitted.
pub fn load<S, I>(store: &mut S, rows: I, config: &LoadConfig) -> Result<LoadReport, StoreError>
where
    S: Store + ?Sized,
    I: IntoIterator<Item = Result<Vec<String>, StoreError>>,
{
    config.validate()?;
    store.register_similarity(&config.similarity_function)?;

    let mut rows = rows.into_iter();
    let columns = rows.next().ok_or(StoreError::EmptyStream)??;
    store.create_relation(&config.table, &columns)?;

    let mut inserted = 0usize;
    for (i, row) in rows.enumerate() {
        let row = row?;
        if row.len() != columns.len() {
            return Err(StoreError::MalformedRecord {
                row: i + 1,
                expected: columns.len(),
                found: row.len(),
            });
        }
        store.insert_row(&config.table, &row)?;
        inserted += 1;
        if inserted % config.batch_size == 0 {
            store.commit()?;
            tracing::info!(count = inserted, "Inserted {inserted} records");
        }
    }

    store.commit()?;
    tracing::info!(table = %config.table, count = inserted, "base table done");

    Ok(LoadReport {
        table: config.table.clone(),
        columns,
        inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory store that records every call, for checking commit placement.
    #[derive(Default)]
    struct RecordingStore {
        created: Option<(String, Vec<String>)>,
        pending: Vec<Vec<String>>,
        committed: Vec<Vec<String>>,
        commits: usize,
        functions: Vec<String>,
    }

    impl Store for RecordingStore {
        fn relation_exists(&self, table: &str) -> Result<bool, StoreError> {
            Ok(self.created.as_ref().is_some_and(|(t, _)| t == table))
        }

        fn create_relation(&mut self, table: &str, columns: &[String]) -> Result<(), StoreError> {
            if self.relation_exists(table)? {
                return Err(StoreError::SchemaConflict { table: table.into() });
            }
            self.created = Some((table.into(), columns.to_vec()));
            Ok(())
        }

        fn insert_row(&mut self, _table: &str, values: &[String]) -> Result<(), StoreError> {
            self.pending.push(values.to_vec());
            Ok(())
        }

        fn register_similarity(&mut self, name: &str) -> Result<(), StoreError> {
            self.functions.push(name.into());
            Ok(())
        }

        fn commit(&mut self) -> Result<(), StoreError> {
            self.committed.append(&mut self.pending);
            self.commits += 1;
            Ok(())
        }

        fn execute(&mut self, _statement: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn row_count(&self, _table: &str) -> Result<usize, StoreError> {
            Ok(self.committed.len())
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Result<Vec<String>, StoreError>> {
        data.iter()
            .map(|r| Ok(r.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    fn config(batch_size: usize) -> LoadConfig {
        LoadConfig { batch_size, ..LoadConfig::default() }
    }

    #[test]
    fn header_defines_relation() {
        let mut store = RecordingStore::default();
        let report = load(&mut store, rows(&[&["a", "b"], &["1", "2"]]), &config(10)).unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.columns, vec!["a", "b"]);
        assert_eq!(store.created, Some(("ted".into(), vec!["a".into(), "b".into()])));
        assert_eq!(store.functions, vec!["edist"]);
    }

    #[test]
    fn commits_every_batch_and_at_end() {
        let mut data: Vec<Vec<String>> = vec![vec!["n".into()]];
        data.extend((0..7).map(|i| vec![i.to_string()]));
        let mut store = RecordingStore::default();
        let report = load(&mut store, data.into_iter().map(Ok), &config(3)).unwrap();

        assert_eq!(report.inserted, 7);
        // after rows 3 and 6, then the final flush
        assert_eq!(store.commits, 3);
        assert_eq!(store.committed.len(), 7);
    }

    #[test]
    fn empty_stream() {
        let mut store = RecordingStore::default();
        let err = load(&mut store, rows(&[]), &config(10)).unwrap_err();
        assert!(matches!(err, StoreError::EmptyStream));
    }

    #[test]
    fn header_only() {
        let mut store = RecordingStore::default();
        let report = load(&mut store, rows(&[&["a"]]), &config(10)).unwrap();
        assert_eq!(report.inserted, 0);
        assert!(store.created.is_some());
    }

    #[test]
    fn short_row_fails_and_keeps_last_batch_only() {
        let mut store = RecordingStore::default();
        let data = rows(&[&["a", "b"], &["1", "2"], &["3", "4"], &["5", "6"], &["7"]]);
        let err = load(&mut store, data, &config(2)).unwrap_err();

        match err {
            StoreError::MalformedRecord { row, expected, found } => {
                assert_eq!((row, expected, found), (4, 2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.committed.len(), 2);
        assert_eq!(store.pending.len(), 1);
    }

    #[test]
    fn long_row_fails() {
        let mut store = RecordingStore::default();
        let err = load(&mut store, rows(&[&["a"], &["1", "2"]]), &config(10)).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { row: 1, expected: 1, found: 2 }));
    }

    #[test]
    fn existing_relation_conflicts() {
        let mut store = RecordingStore::default();
        load(&mut store, rows(&[&["a"]]), &config(10)).unwrap();
        let err = load(&mut store, rows(&[&["a"]]), &config(10)).unwrap_err();
        assert!(matches!(err, StoreError::SchemaConflict { .. }));
    }

    #[test]
    fn stream_error_propagates() {
        let mut store = RecordingStore::default();
        let data = vec![
            Ok(vec!["a".to_string()]),
            Err(StoreError::Io(std::io::Error::other("boom"))),
        ];
        let err = load(&mut store, data, &config(10)).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
