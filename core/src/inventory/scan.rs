use super::tags::{
    get_int_value, get_string_value, PIXEL_DATA, PROTOCOL_NAME, SERIES_DESCRIPTION,
    SERIES_INSTANCE_UID, SERIES_NUMBER,
};
use crate::error::Result;
use crate::types::SequenceRecord;
use dicom_object::{InMemDicomObject, OpenFileOptions};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Series assembled from the instances that share a SeriesInstanceUID
#[derive(Debug, Clone)]
struct SeriesGroup {
    uid: String,
    number: Option<i32>,
    description: Option<String>,
    protocol: Option<String>,
    dir_name: Option<String>,
    files: u32,
}

impl SeriesGroup {
    /// heudiconv names series `<SeriesNumber>-<ProtocolName>`
    fn series_id(&self) -> String {
        match (self.number, &self.protocol) {
            (Some(number), Some(protocol)) if !protocol.is_empty() => {
                format!("{}-{}", number, protocol)
            }
            _ => self.uid.clone(),
        }
    }

    fn into_record(self) -> SequenceRecord {
        SequenceRecord {
            series_id: self.series_id(),
            series_description: self.description,
            protocol_name: self.protocol,
            dcm_dir_name: self.dir_name,
            series_files: Some(self.files),
        }
    }
}

/// Inventories a directory of DICOM files into one record per series
///
/// Files are found recursively and grouped by SeriesInstanceUID. Only
/// headers are read. Files that cannot be parsed, or carry no series UID,
/// are skipped with a warning. Records are ordered by series number, then
/// UID, with unnumbered series last. A tag that is present but empty gives
/// an empty string; only a missing tag leaves the attribute absent.
///
/// # Errors
///
/// Returns an error only if the directory tree cannot be listed.
pub fn scan_directory(directory: &Path) -> Result<Vec<SequenceRecord>> {
    let files = collect_dicom_files(directory)?;
    info!(
        "Found {} DICOM files under {}",
        files.len(),
        directory.display()
    );

    let mut groups: HashMap<String, SeriesGroup> = HashMap::new();

    for path in files {
        let dcm = match OpenFileOptions::new()
            .read_until(PIXEL_DATA)
            .open_file(&path)
        {
            Ok(dcm) => dcm,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if let Err(reason) = add_instance(&mut groups, &path, &dcm) {
            warn!("Skipping {}: {}", path.display(), reason);
        }
    }

    let mut series: Vec<SeriesGroup> = groups.into_values().collect();
    series.sort_by(|a, b| {
        a.number
            .unwrap_or(i32::MAX)
            .cmp(&b.number.unwrap_or(i32::MAX))
            .then_with(|| a.uid.cmp(&b.uid))
    });

    info!("Assembled {} series", series.len());
    Ok(series.into_iter().map(SeriesGroup::into_record).collect())
}

fn add_instance(
    groups: &mut HashMap<String, SeriesGroup>,
    path: &Path,
    dcm: &InMemDicomObject,
) -> std::result::Result<(), &'static str> {
    let uid = get_string_value(dcm, SERIES_INSTANCE_UID)
        .filter(|uid| !uid.is_empty())
        .ok_or("no SeriesInstanceUID")?;

    let group = groups.entry(uid.clone()).or_insert_with(|| {
        debug!("New series {} from {}", uid, path.display());
        SeriesGroup {
            uid: uid.clone(),
            number: get_int_value(dcm, SERIES_NUMBER),
            description: get_string_value(dcm, SERIES_DESCRIPTION),
            protocol: get_string_value(dcm, PROTOCOL_NAME),
            dir_name: path
                .parent()
                .and_then(|p| p.file_name())
                .map(|name| name.to_string_lossy().into_owned()),
            files: 0,
        }
    });
    group.files += 1;

    Ok(())
}

/// Recursively collects DICOM files, sorted by path
///
/// Accepts `.dcm` and `.dicom` extensions (any case) and extension-less
/// files carrying the DICOM magic.
pub fn collect_dicom_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();

            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                match path.extension() {
                    Some(ext) => {
                        if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                            files.push(path);
                        }
                    }
                    None => {
                        if is_dicom_file(&path) {
                            debug!("Found headerless DICOM file: {}", path.display());
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}
