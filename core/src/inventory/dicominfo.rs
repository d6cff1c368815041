//! heudiconv `dicominfo.tsv` tables
//!
//! Only the columns rules can inspect are read; the remaining heudiconv
//! columns (dimensions, TR/TE, flags) are ignored.

use crate::error::{HeuclassError, Result};
use crate::types::{RecordField, SequenceRecord, SERIES_FILES};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const SERIES_ID: &str = "series_id";

/// Columns written by [`write_dicominfo`], in order
pub const DICOMINFO_COLUMNS: [&str; 5] = [
    SERIES_ID,
    "series_description",
    "protocol_name",
    "dcm_dir_name",
    SERIES_FILES,
];

/// Reads sequence records from a dicominfo.tsv file
pub fn read_dicominfo(path: &Path) -> Result<Vec<SequenceRecord>> {
    let records = read_dicominfo_from(File::open(path)?)?;
    debug!("Read {} series from {}", records.len(), path.display());
    Ok(records)
}

/// Reads sequence records from tab-separated text with a header row
///
/// Text cells are taken verbatim, so a blank cell is an empty string.
/// A text attribute is absent only when its column is missing. A blank
/// `series_files` cell is an absent file count.
///
/// # Errors
///
/// Returns [`HeuclassError::InvalidValue`] if the `series_id` column is
/// missing or blank, or if `series_files` is not a non-negative integer.
pub fn read_dicominfo_from<R: Read>(reader: R) -> Result<Vec<SequenceRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_col = column(SERIES_ID).ok_or_else(|| {
        HeuclassError::InvalidValue("dicominfo table has no 'series_id' column".to_string())
    })?;
    let description_col = column(RecordField::SeriesDescription.name());
    let protocol_col = column(RecordField::ProtocolName.name());
    let dir_col = column(RecordField::DcmDirName.name());
    let files_col = column(SERIES_FILES);

    let mut records = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let line = result?;
        let series_id = trimmed_cell(&line, Some(id_col))
            .ok_or_else(|| {
                HeuclassError::InvalidValue(format!("row {}: blank series_id", row + 1))
            })?
            .to_string();

        let series_files = match trimmed_cell(&line, files_col) {
            Some(raw) => Some(parse_file_count(raw).ok_or_else(|| {
                HeuclassError::InvalidValue(format!(
                    "row {}: series_files '{}' is not a file count",
                    row + 1,
                    raw
                ))
            })?),
            None => None,
        };

        records.push(SequenceRecord {
            series_id,
            series_description: text_cell(&line, description_col),
            protocol_name: text_cell(&line, protocol_col),
            dcm_dir_name: text_cell(&line, dir_col),
            series_files,
        });
    }

    Ok(records)
}

fn text_cell(line: &StringRecord, column: Option<usize>) -> Option<String> {
    column.map(|i| line.get(i).unwrap_or_default().to_string())
}

fn trimmed_cell(line: &StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|i| line.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// pandas writes integer columns holding NaN as floats ("24.0")
fn parse_file_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

/// Writes sequence records as a dicominfo.tsv file
pub fn write_dicominfo(path: &Path, records: &[SequenceRecord]) -> Result<()> {
    write_dicominfo_to(File::create(path)?, records)?;
    debug!("Wrote {} series to {}", records.len(), path.display());
    Ok(())
}

/// Writes sequence records as tab-separated text with a header row
///
/// Absent text attributes are written as blank cells and so read back as
/// empty strings.
pub fn write_dicominfo_to<W: Write>(writer: W, records: &[SequenceRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(DICOMINFO_COLUMNS)?;

    for record in records {
        let files = record
            .series_files
            .map(|n| n.to_string())
            .unwrap_or_default();
        wtr.write_record([
            record.series_id.as_str(),
            record.series_description.as_deref().unwrap_or(""),
            record.protocol_name.as_deref().unwrap_or(""),
            record.dcm_dir_name.as_deref().unwrap_or(""),
            files.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
