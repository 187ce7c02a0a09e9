// CSV input/output for source files and the merged stream

use std::io::{Read, Write};
use std::path::Path;

use tedlink_recon::MergeOutput;

use crate::error::StoreError;

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, StoreError> {
    let bytes = std::fs::read(path)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Write the merged rows under their fixed header.
///
/// Every non-numeric field is quoted, so values containing the delimiter stay unambiguous.
pub fn write_merged<W: Write>(writer: W, output: &MergeOutput) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(writer);

    writer.write_record(&output.columns)?;
    for row in &output.rows {
        writer.write_record(&row.values)?;
    }
    writer.flush()?;
    Ok(())
}

/// Lazily read raw CSV rows, header included, without checking their width.
pub fn read_rows<R: Read>(reader: R) -> impl Iterator<Item = Result<Vec<String>, StoreError>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(StoreError::from)
        })
}
