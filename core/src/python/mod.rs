//! Python bindings for heuclass
//!
//! Lets a heudiconv heuristic file delegate `infotodict(seqinfo)` to the
//! rule engine.

// Suppress false positive warnings from PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod errors;
mod heuristic;
mod key;
mod record;
mod utils;

pub use errors::*;
pub use heuristic::*;
pub use key::*;
pub use record::*;

/// Python module definition
#[pymodule]
fn _heuclass(py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Register exception classes
    m.add(
        "HeuclassError",
        py.get_type_bound::<errors::PyHeuclassError>(),
    )?;
    m.add(
        "InvalidTemplateError",
        py.get_type_bound::<errors::PyInvalidTemplateError>(),
    )?;
    m.add(
        "MalformedRecordError",
        py.get_type_bound::<errors::PyMalformedRecordError>(),
    )?;
    m.add("ConfigError", py.get_type_bound::<errors::PyConfigError>())?;
    m.add(
        "InventoryError",
        py.get_type_bound::<errors::PyInventoryError>(),
    )?;

    m.add_class::<PyOutputKey>()?;
    m.add_class::<PySequenceRecord>()?;
    m.add_class::<PyHeuristic>()?;

    m.add_function(wrap_pyfunction!(py_build_key, m)?)?;

    // Add version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
