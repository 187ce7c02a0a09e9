use std::collections::{BTreeMap, BTreeSet};

use crate::config::SourceConfig;
use crate::error::ReconError;
use crate::model::SourceRecord;
use crate::normalize::normalize_key;

/// Normalized join key -> record for one source.
#[derive(Debug, Default)]
pub struct CrossRef<'a> {
    pub records: BTreeMap<String, &'a SourceRecord>,
    /// Records replaced by a later record with the same key (last wins).
    pub overwritten: usize,
}

impl<'a> CrossRef<'a> {
    pub fn keys(&self) -> BTreeSet<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&'a SourceRecord> {
        self.records.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Index `records` by the normalized value of the source's key field.
///
/// A later record with the same key replaces the earlier one. Rows are numbered from 1,
/// counting data rows only.
pub fn build_cross_ref<'a>(
    records: &'a [SourceRecord],
    source: &SourceConfig,
) -> Result<CrossRef<'a>, ReconError> {
    let mut xref = CrossRef::default();

    for (i, record) in records.iter().enumerate() {
        let raw = record.get(&source.key_field).ok_or_else(|| ReconError::MissingKeyField {
            role: source.name.clone(),
            key_field: source.key_field.clone(),
            row: i + 1,
        })?;
        let key = normalize_key(raw);
        if xref.records.insert(key.clone(), record).is_some() {
            tracing::warn!(source = %source.name, key = %key, row = i + 1, "duplicate key, keeping later record");
            xref.overwritten += 1;
        }
    }

    Ok(xref)
}

/// Key-set comparison of two cross-reference maps.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyOverlap<'k> {
    pub matched: BTreeSet<&'k str>,
    pub left_only: BTreeSet<&'k str>,
    pub right_only: BTreeSet<&'k str>,
}

impl<'k> KeyOverlap<'k> {
    /// All keys from both sides, ascending.
    pub fn union(&self) -> BTreeSet<&'k str> {
        self.matched
            .iter()
            .chain(&self.left_only)
            .chain(&self.right_only)
            .copied()
            .collect()
    }
}

pub fn compare_keys<'k>(left: &BTreeSet<&'k str>, right: &BTreeSet<&'k str>) -> KeyOverlap<'k> {
    KeyOverlap {
        matched: left.intersection(right).copied().collect(),
        left_only: left.difference(right).copied().collect(),
        right_only: right.difference(left).copied().collect(),
    }
}
