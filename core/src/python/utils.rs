//! Conversions between heudiconv's Python conventions and crate types

use pyo3::prelude::*;
use pyo3::types::PyTuple;

use crate::types::{OutputKey, SequenceRecord};

/// Reads an optional attribute; missing attributes and None both map to `None`
pub fn optional_attr<'py, T>(obj: &Bound<'py, PyAny>, name: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match obj.getattr(name) {
        Ok(value) if !value.is_none() => value.extract::<T>().map(Some),
        _ => Ok(None),
    }
}

/// Builds a record from a heudiconv `SeqInfo` or any object with the same attributes
///
/// Only `series_id` is required here; other attributes are checked when a
/// rule inspects them.
pub fn record_from_seqinfo(obj: &Bound<'_, PyAny>) -> PyResult<SequenceRecord> {
    let series_id: String = obj.getattr("series_id")?.str()?.extract()?;
    Ok(SequenceRecord {
        series_id,
        series_description: optional_attr(obj, "series_description")?,
        protocol_name: optional_attr(obj, "protocol_name")?,
        dcm_dir_name: optional_attr(obj, "dcm_dir_name")?,
        series_files: optional_attr(obj, "series_files")?,
    })
}

/// The `(template, outtype, annotation_classes)` tuple heudiconv's `create_key` returns
pub fn key_tuple<'py>(py: Python<'py>, key: &OutputKey) -> Bound<'py, PyTuple> {
    let outtype: Vec<&str> = key.outtype().iter().map(|t| t.simple_name()).collect();
    let annotation_classes: PyObject = match key.annotation_classes() {
        Some(classes) => PyTuple::new_bound(py, classes).into_py(py),
        None => py.None(),
    };
    PyTuple::new_bound(
        py,
        [
            key.template().into_py(py),
            PyTuple::new_bound(py, outtype).into_py(py),
            annotation_classes,
        ],
    )
}
