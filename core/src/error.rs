use thiserror::Error;

/// Result type for heuclass operations
pub type Result<T> = std::result::Result<T, HeuclassError>;

/// Error types for heuclass operations
#[derive(Error, Debug)]
pub enum HeuclassError {
    /// Output key template is empty, absent or otherwise unroutable
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// A rule inspected an attribute the record does not carry
    #[error("Malformed record {series_id}: missing attribute '{attribute}'")]
    MalformedRecord {
        series_id: String,
        attribute: &'static str,
    },

    /// A rule targets a key that is not part of the key catalog
    #[error("Rule targets undeclared key: {0}")]
    UndeclaredKey(String),

    /// Two keys in one heuristic share a name
    #[error("Duplicate key name: {0}")]
    DuplicateKey(String),

    /// Two rules with the same predicate and target
    #[error("Duplicate rule for key '{key}' at position {index}")]
    DuplicateRule { key: String, index: usize },

    /// Rule that can never be evaluated meaningfully
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// No built-in heuristic with this name
    #[error("Unknown site heuristic: {0}")]
    UnknownSite(String),

    /// Heuristic configuration could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// Classification result could not be serialized
    #[error("Failed to serialize output: {0}")]
    OutputError(serde_json::Error),

    /// Invalid attribute value in an inventory
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// dicominfo.tsv reading or writing error
    #[error("TSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HeuclassError {
    /// Whether this error stems from the heuristic configuration rather than the input data
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            HeuclassError::InvalidTemplate(_)
                | HeuclassError::UndeclaredKey(_)
                | HeuclassError::DuplicateKey(_)
                | HeuclassError::DuplicateRule { .. }
                | HeuclassError::InvalidRule(_)
                | HeuclassError::UnknownSite(_)
                | HeuclassError::ConfigError(_)
        )
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for HeuclassError {
    fn from(e: dicom_object::ReadError) -> Self {
        HeuclassError::DicomError(format!("{}", e))
    }
}
