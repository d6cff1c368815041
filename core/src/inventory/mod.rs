//! Sequence inventories: heudiconv dicominfo.tsv tables and DICOM directory scans

pub mod dicominfo;
pub mod scan;
pub mod tags;

pub use dicominfo::{read_dicominfo, read_dicominfo_from, write_dicominfo, write_dicominfo_to};
pub use scan::{collect_dicom_files, is_dicom_file, scan_directory};

use crate::error::Result;
use crate::types::SequenceRecord;
use std::path::Path;

/// Loads records from a DICOM directory or a dicominfo.tsv file
pub fn load_records(input: &Path) -> Result<Vec<SequenceRecord>> {
    if input.is_dir() {
        scan_directory(input)
    } else {
        read_dicominfo(input)
    }
}
