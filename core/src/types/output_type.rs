use crate::error::{HeuclassError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File type produced for an output key by the downstream converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// Compressed NIfTI volume
    #[serde(rename = "nii.gz")]
    NiiGz,
    /// Uncompressed NIfTI volume
    #[serde(rename = "nii")]
    Nii,
    /// Original DICOM instances
    #[serde(rename = "dicom")]
    Dicom,
}

/// Output types used when a key does not name any
pub const DEFAULT_OUTPUT_TYPES: [OutputType; 1] = [OutputType::NiiGz];

impl OutputType {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            OutputType::NiiGz => "nii.gz",
            OutputType::Nii => "nii",
            OutputType::Dicom => "dicom",
        }
    }

    /// Parses output type from string
    ///
    /// Accepts the names used in heudiconv heuristics, with or without a leading dot.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "nii.gz" => Ok(OutputType::NiiGz),
            "nii" => Ok(OutputType::Nii),
            "dicom" | "dcm" => Ok(OutputType::Dicom),
            other => Err(HeuclassError::InvalidValue(format!(
                "Unknown output type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
