use std::io::Read;
use std::sync::Arc;

use crate::config::{JoinConfig, OutputColumn};
use crate::error::ReconError;
use crate::matcher::{build_cross_ref, compare_keys, CrossRef};
use crate::model::{MergeOutput, MergeStats, MergedRow, SourceRecord};

/// Cross-reference both sources by normalized key and emit one row per key in the union,
/// ascending by key.
pub fn merge(
    config: &JoinConfig,
    primary: &[SourceRecord],
    secondary: &[SourceRecord],
) -> Result<MergeOutput, ReconError> {
    let primary_xref = build_cross_ref(primary, &config.primary)?;
    tracing::info!(source = %config.primary.name, records = primary.len(), keys = primary_xref.len(), "indexed source");
    let secondary_xref = build_cross_ref(secondary, &config.secondary)?;
    tracing::info!(source = %config.secondary.name, records = secondary.len(), keys = secondary_xref.len(), "indexed source");

    let primary_keys = primary_xref.keys();
    let secondary_keys = secondary_xref.keys();
    let overlap = compare_keys(&primary_keys, &secondary_keys);

    let stats = MergeStats {
        primary_records: primary.len(),
        secondary_records: secondary.len(),
        primary_keys: primary_keys.len(),
        secondary_keys: secondary_keys.len(),
        matched: overlap.matched.len(),
        primary_only: overlap.left_only.len(),
        secondary_only: overlap.right_only.len(),
        duplicates_primary: primary_xref.overwritten,
        duplicates_secondary: secondary_xref.overwritten,
    };
    tracing::info!(count = stats.matched, "matched in both sources");
    tracing::info!(count = stats.primary_only, source = %config.primary.name, "only in source");
    tracing::info!(count = stats.secondary_only, source = %config.secondary.name, "only in source");

    let rows = overlap
        .union()
        .into_iter()
        .map(|key| merge_row(key, &config.columns, &primary_xref, &secondary_xref))
        .collect();

    Ok(MergeOutput {
        columns: config.column_names(),
        rows,
        stats,
    })
}

fn merge_row(
    key: &str,
    columns: &[OutputColumn],
    primary: &CrossRef<'_>,
    secondary: &CrossRef<'_>,
) -> MergedRow {
    let p = primary.get(key);
    let s = secondary.get(key);

    let values = columns
        .iter()
        .map(|col| {
            let from_primary = col
                .primary
                .as_deref()
                .and_then(|field| p.and_then(|r| r.get(field)));
            let from_secondary = || {
                col.secondary
                    .as_deref()
                    .and_then(|field| s.and_then(|r| r.get(field)))
            };
            from_primary.or_else(from_secondary).unwrap_or("").to_string()
        })
        .collect();

    MergedRow {
        key: key.to_string(),
        in_primary: p.is_some(),
        in_secondary: s.is_some(),
        values,
    }
}

/// Read every row of a headed CSV source.
///
/// Rows may be shorter or longer than the header; missing trailing fields are absent
/// from the record rather than empty.
pub fn load_records<R: Read>(role: &str, reader: R) -> Result<Vec<SourceRecord>, ReconError> {
    let csv_err = |e: csv::Error| ReconError::Csv {
        role: role.into(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Arc<[String]> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let values = record.iter().take(headers.len()).map(|v| v.to_string()).collect();
        rows.push(SourceRecord::new(headers.clone(), values));
    }

    tracing::debug!(source = role, count = rows.len(), "read records");
    Ok(rows)
}
