//! Python wrapper for OutputKey

use pyo3::prelude::*;
use pyo3::types::PyTuple;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::errors::convert_error;
use super::utils::key_tuple;
use crate::types::{build_key, OutputKey, OutputType};

/// Destination category for classified series
#[pyclass(name = "OutputKey", module = "heuclass")]
#[derive(Clone, Debug)]
pub struct PyOutputKey {
    pub(crate) inner: OutputKey,
}

impl From<OutputKey> for PyOutputKey {
    fn from(inner: OutputKey) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyOutputKey {
    /// Create a key, validating its template
    ///
    /// Args:
    ///     template: Output path template, e.g. "sub-{subject}/{session}/anat/sub-{subject}_{session}_T1w"
    ///     outtype: Output types (default: ("nii.gz",))
    ///     annotation_classes: Optional annotation classes
    ///
    /// Raises:
    ///     InvalidTemplateError: If the template is None, empty or malformed
    #[new]
    #[pyo3(signature = (template, outtype=None, annotation_classes=None))]
    fn new(
        template: Option<String>,
        outtype: Option<Vec<String>>,
        annotation_classes: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let outtype = outtype
            .unwrap_or_default()
            .iter()
            .map(|s| OutputType::from_str(s))
            .collect::<crate::error::Result<Vec<_>>>()
            .map_err(convert_error)?;
        let key = build_key(template.as_deref(), outtype, annotation_classes)
            .map_err(convert_error)?;
        Ok(key.into())
    }

    #[getter]
    fn template(&self) -> &str {
        self.inner.template()
    }

    #[getter]
    fn outtype(&self) -> Vec<&'static str> {
        self.inner.outtype().iter().map(|t| t.simple_name()).collect()
    }

    #[getter]
    fn annotation_classes(&self) -> Option<Vec<String>> {
        self.inner.annotation_classes().map(|c| c.to_vec())
    }

    /// Substitute subject and session placeholders
    #[pyo3(signature = (subject, session=None))]
    fn render(&self, subject: &str, session: Option<&str>) -> String {
        self.inner.render(subject, session)
    }

    /// The key as heudiconv's create_key tuple
    fn as_tuple<'py>(&self, py: Python<'py>) -> Bound<'py, PyTuple> {
        key_tuple(py, &self.inner)
    }

    fn __eq__(&self, other: &PyOutputKey) -> bool {
        self.inner == other.inner
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.inner.hash(&mut hasher);
        hasher.finish()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "OutputKey({:?}, outtype={:?})",
            self.inner.template(),
            self.outtype()
        )
    }
}

/// Build an output key (heudiconv's create_key, validated)
///
/// Args:
///     template: Output path template
///     outtype: Output types (default: ("nii.gz",))
///     annotation_classes: Optional annotation classes
///
/// Returns:
///     OutputKey: The validated key
///
/// Raises:
///     InvalidTemplateError: If the template is None, empty or malformed
#[pyfunction]
#[pyo3(name = "build_key", signature = (template, outtype=None, annotation_classes=None))]
pub fn py_build_key(
    template: Option<String>,
    outtype: Option<Vec<String>>,
    annotation_classes: Option<Vec<String>>,
) -> PyResult<PyOutputKey> {
    PyOutputKey::new(template, outtype, annotation_classes)
}
