//! Python wrapper for SequenceRecord

use pyo3::prelude::*;

use crate::types::SequenceRecord;

/// One acquired series as seen before conversion
#[pyclass(name = "SequenceRecord", module = "heuclass")]
#[derive(Clone)]
pub struct PySequenceRecord {
    pub(crate) inner: SequenceRecord,
}

impl From<SequenceRecord> for PySequenceRecord {
    fn from(inner: SequenceRecord) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PySequenceRecord {
    #[new]
    #[pyo3(signature = (series_id, series_description=None, protocol_name=None, dcm_dir_name=None, series_files=None))]
    fn new(
        series_id: String,
        series_description: Option<String>,
        protocol_name: Option<String>,
        dcm_dir_name: Option<String>,
        series_files: Option<u32>,
    ) -> Self {
        SequenceRecord {
            series_id,
            series_description,
            protocol_name,
            dcm_dir_name,
            series_files,
        }
        .into()
    }

    #[getter]
    fn series_id(&self) -> &str {
        &self.inner.series_id
    }

    #[getter]
    fn series_description(&self) -> Option<&str> {
        self.inner.series_description.as_deref()
    }

    #[getter]
    fn protocol_name(&self) -> Option<&str> {
        self.inner.protocol_name.as_deref()
    }

    #[getter]
    fn dcm_dir_name(&self) -> Option<&str> {
        self.inner.dcm_dir_name.as_deref()
    }

    #[getter]
    fn series_files(&self) -> Option<u32> {
        self.inner.series_files
    }

    fn __repr__(&self) -> String {
        format!(
            "SequenceRecord({:?}, series_description={:?})",
            self.inner.series_id, self.inner.series_description
        )
    }
}
