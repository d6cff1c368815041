use crate::error::{HeuclassError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text attribute of a sequence record that rules can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// Series description entered at the scanner
    SeriesDescription,
    /// Protocol name of the acquisition
    ProtocolName,
    /// Name of the directory holding the series' DICOM files
    DcmDirName,
}

impl RecordField {
    /// Attribute name as it appears in dicominfo.tsv and heudiconv's seqinfo
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::SeriesDescription => "series_description",
            RecordField::ProtocolName => "protocol_name",
            RecordField::DcmDirName => "dcm_dir_name",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Attribute name of the file count
pub const SERIES_FILES: &str = "series_files";

/// One acquired series, as inventoried before conversion
///
/// Only `series_id` is mandatory; it is passed through to the output
/// untouched. Other attributes may be absent when the inventory could not
/// provide them, which only matters if a rule inspects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Opaque series identifier handed to the converter
    pub series_id: String,

    /// Series description
    pub series_description: Option<String>,

    /// Protocol name
    pub protocol_name: Option<String>,

    /// DICOM directory name
    pub dcm_dir_name: Option<String>,

    /// Number of files in the series
    pub series_files: Option<u32>,
}

impl SequenceRecord {
    /// Creates a record with only its identifier set
    pub fn new(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            series_description: None,
            protocol_name: None,
            dcm_dir_name: None,
            series_files: None,
        }
    }

    /// Builder: Set series description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.series_description = Some(description.into());
        self
    }

    /// Builder: Set protocol name
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol_name = Some(protocol.into());
        self
    }

    /// Builder: Set DICOM directory name
    pub fn with_dir_name(mut self, dir_name: impl Into<String>) -> Self {
        self.dcm_dir_name = Some(dir_name.into());
        self
    }

    /// Builder: Set file count
    pub fn with_files(mut self, files: u32) -> Self {
        self.series_files = Some(files);
        self
    }

    /// Returns a text attribute
    ///
    /// # Errors
    ///
    /// Returns [`HeuclassError::MalformedRecord`] if the attribute is absent.
    pub fn text(&self, field: RecordField) -> Result<&str> {
        let value = match field {
            RecordField::SeriesDescription => self.series_description.as_deref(),
            RecordField::ProtocolName => self.protocol_name.as_deref(),
            RecordField::DcmDirName => self.dcm_dir_name.as_deref(),
        };
        value.ok_or_else(|| self.missing(field.name()))
    }

    /// Returns the file count
    ///
    /// # Errors
    ///
    /// Returns [`HeuclassError::MalformedRecord`] if the count is absent.
    pub fn file_count(&self) -> Result<u32> {
        self.series_files.ok_or_else(|| self.missing(SERIES_FILES))
    }

    fn missing(&self, attribute: &'static str) -> HeuclassError {
        HeuclassError::MalformedRecord {
            series_id: self.series_id.clone(),
            attribute,
        }
    }
}
