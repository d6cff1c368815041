//! Python wrapper for Heuristic

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::path::PathBuf;

use super::errors::convert_error;
use super::key::PyOutputKey;
use super::record::PySequenceRecord;
use super::utils::{key_tuple, record_from_seqinfo};
use crate::classification::Heuristic;
use crate::types::SequenceRecord;

/// Named output keys and the ordered rules that route series to them
///
/// Example:
///     >>> from heuclass import Heuristic
///     >>> heuristic = Heuristic.from_site("hchs")
///     >>> info = heuristic.infotodict(seqinfo)
#[pyclass(name = "Heuristic", module = "heuclass")]
pub struct PyHeuristic {
    inner: Heuristic,
}

impl PyHeuristic {
    /// Accepts SequenceRecord instances or any object shaped like heudiconv's SeqInfo
    fn collect_records(records: &Bound<'_, PyAny>) -> PyResult<Vec<SequenceRecord>> {
        records
            .iter()?
            .map(|item| {
                let item = item?;
                match item.downcast::<PySequenceRecord>() {
                    Ok(record) => Ok(record.borrow().inner.clone()),
                    Err(_) => record_from_seqinfo(&item),
                }
            })
            .collect()
    }
}

#[pymethods]
impl PyHeuristic {
    /// Load a built-in site configuration
    ///
    /// Raises:
    ///     ConfigError: If the site is unknown
    #[staticmethod]
    fn from_site(site: &str) -> PyResult<Self> {
        let inner = Heuristic::builtin(site).map_err(convert_error)?;
        Ok(Self { inner })
    }

    /// Load and validate a JSON heuristic file
    #[staticmethod]
    fn from_file(path: PathBuf) -> PyResult<Self> {
        let inner = Heuristic::from_file(&path).map_err(convert_error)?;
        Ok(Self { inner })
    }

    /// Parse and validate a JSON heuristic document
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let inner = Heuristic::from_json(json).map_err(convert_error)?;
        Ok(Self { inner })
    }

    /// Names of the built-in site configurations
    #[staticmethod]
    fn builtin_sites() -> Vec<&'static str> {
        Heuristic::builtin_sites().collect()
    }

    #[getter]
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Key names in declaration order
    fn key_names(&self) -> Vec<String> {
        self.inner.key_names().map(String::from).collect()
    }

    /// Look up a key by name
    fn key(&self, name: &str) -> Option<PyOutputKey> {
        self.inner.key(name).cloned().map(PyOutputKey::from)
    }

    /// Classify records, returning key name -> list of series ids
    ///
    /// Every key is present; keys without a match map to an empty list.
    ///
    /// Raises:
    ///     MalformedRecordError: If a rule inspects a missing attribute
    fn classify<'py>(
        &self,
        py: Python<'py>,
        records: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let records = Self::collect_records(records)?;
        let result = self.inner.classify(&records).map_err(convert_error)?;

        let dict = PyDict::new_bound(py);
        for entry in result.iter() {
            let name = self.inner.name_of(&entry.key).unwrap_or(entry.key.template());
            dict.set_item(name, PyList::new_bound(py, &entry.series_ids))?;
        }
        Ok(dict)
    }

    /// Drop-in body for a heudiconv heuristic's `infotodict`
    ///
    /// Returns a dict keyed by `(template, outtype, annotation_classes)` tuples.
    fn infotodict<'py>(
        &self,
        py: Python<'py>,
        seqinfo: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let records = Self::collect_records(seqinfo)?;
        let result = self.inner.classify(&records).map_err(convert_error)?;

        let dict = PyDict::new_bound(py);
        for entry in result.iter() {
            dict.set_item(
                key_tuple(py, &entry.key),
                PyList::new_bound(py, &entry.series_ids),
            )?;
        }
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Heuristic({:?}, keys={}, rules={})",
            self.inner.name(),
            self.inner.named_keys().len(),
            self.inner.rules().len()
        )
    }
}
