use std::fs::File;
use std::path::{Path, PathBuf};

use tedlink_io::csv::read_rows;
use tedlink_io::{build_matches, load, LoadConfig, SqliteStore, Store, StoreError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn match_script() -> String {
    std::fs::read_to_string(fixture("matching_speakers.sql")).unwrap()
}

fn load_fixture(store: &mut SqliteStore, config: &LoadConfig) -> usize {
    let rows = read_rows(File::open(fixture("merged.csv")).unwrap());
    load(store, rows, config).unwrap().inserted
}

fn load_and_match(path: &Path) -> (usize, usize) {
    let config = LoadConfig::default();
    let mut store = SqliteStore::create_fresh(path).unwrap();
    let inserted = load_fixture(&mut store, &config);
    let matches = build_matches(&mut store, &match_script(), &config.derived_table).unwrap();
    store.close().unwrap();
    (inserted, matches)
}

#[test]
fn loaded_rows_read_back_unchanged() {
    let config = LoadConfig::default();
    let mut store = SqliteStore::open_in_memory().unwrap();
    let inserted = load_fixture(&mut store, &config);

    let expected: Vec<Vec<String>> = read_rows(File::open(fixture("merged.csv")).unwrap())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(inserted, expected.len() - 1);
    assert_eq!(store.row_count("ted").unwrap(), inserted);
    assert_eq!(store.columns("ted").unwrap(), expected[0]);
    assert_eq!(store.rows("ted").unwrap(), expected[1..].to_vec());
}

#[test]
fn derived_matches_link_spelling_variants() {
    let config = LoadConfig::default();
    let mut store = SqliteStore::open_in_memory().unwrap();
    load_fixture(&mut store, &config);

    let count = build_matches(&mut store, &match_script(), &config.derived_table).unwrap();
    assert_eq!(count, 2);

    let pairs: Vec<(String, String)> = {
        let mut stmt = store
            .connection()
            .prepare("SELECT speaker, other_speaker FROM matching_speakers ORDER BY speaker")
            .unwrap();
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        rows
    };
    assert_eq!(
        pairs,
        vec![
            ("Al Gore".to_string(), "al gore ".to_string()),
            ("Hans Roslin".to_string(), "Hans Rosling".to_string()),
        ]
    );
}

#[test]
fn fresh_loads_are_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let first = load_and_match(&dir.path().join("one.db"));
    let second = load_and_match(&dir.path().join("two.db"));
    assert_eq!(first, second);
    assert_eq!(first, (7, 2));
}

#[test]
fn loading_into_existing_relation_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.db");
    load_and_match(&path);

    let mut store = SqliteStore::open(&path).unwrap();
    let rows = read_rows(File::open(fixture("merged.csv")).unwrap());
    let err = load(&mut store, rows, &LoadConfig::default()).unwrap_err();
    assert!(matches!(err, StoreError::SchemaConflict { ref table } if table == "ted"));
}

#[test]
fn short_row_leaves_only_committed_batches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.db");
    let config = LoadConfig { batch_size: 2, ..LoadConfig::default() };

    let input = "a,b\n1,2\n3,4\n5,6\n7\n8,9\n";
    {
        let mut store = SqliteStore::open(&path).unwrap();
        let err = load(&mut store, read_rows(input.as_bytes()), &config).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { row: 4, expected: 2, found: 1 }));
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.row_count("ted").unwrap(), 2);
}

#[test]
fn second_row_short_commits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.db");
    {
        let mut store = SqliteStore::open(&path).unwrap();
        let err = load(&mut store, read_rows("a,b\n1\n".as_bytes()), &LoadConfig::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { row: 1, .. }));
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.row_count("ted").unwrap(), 0);
}

#[test]
fn failing_statement_reports_index_and_commits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.db");
    let script = "create table derived as select * from ted;\nselect nope from missing;\n";
    {
        let mut store = SqliteStore::open(&path).unwrap();
        load_fixture(&mut store, &LoadConfig::default());
        let err = build_matches(&mut store, script, "derived").unwrap_err();
        match err {
            StoreError::ScriptExecution { index, ref statement, .. } => {
                assert_eq!(index, 1);
                assert_eq!(statement, "select nope from missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    let store = SqliteStore::open(&path).unwrap();
    assert!(!store.relation_exists("derived").unwrap());
    assert_eq!(store.row_count("ted").unwrap(), 7);
}

#[test]
fn script_can_use_similarity_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.db");
    load_and_match(&path);

    let mut store = SqliteStore::open(&path).unwrap();
    store.register_similarity("edist").unwrap();
    let count = build_matches(
        &mut store,
        "create table close_titles as select headline from ted where edist(headline, 'simplicity sell') < 0.1",
        "close_titles",
    )
    .unwrap();
    assert_eq!(count, 1);
}
