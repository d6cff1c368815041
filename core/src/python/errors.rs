//! Python exception types for heuclass
//!
//! This module defines Python exception classes that map to Rust error types.

// Suppress warnings from PyO3's create_exception! macro about gil-refs feature
#![allow(unexpected_cfgs)]

use pyo3::{create_exception, exceptions::PyException, prelude::*};

use crate::error::HeuclassError;

// Base exception
create_exception!(
    heuclass,
    PyHeuclassError,
    PyException,
    "Base exception for all heuclass errors"
);

// Specific exceptions
create_exception!(
    heuclass,
    PyInvalidTemplateError,
    PyHeuclassError,
    "Output key template is empty or unusable"
);

create_exception!(
    heuclass,
    PyMalformedRecordError,
    PyHeuclassError,
    "A rule inspected an attribute the sequence record does not carry"
);

create_exception!(
    heuclass,
    PyConfigError,
    PyHeuclassError,
    "Heuristic configuration is invalid"
);

create_exception!(
    heuclass,
    PyInventoryError,
    PyHeuclassError,
    "Sequence inventory could not be read or written"
);

/// Convert Rust HeuclassError to appropriate Python exception
pub fn convert_error(err: HeuclassError) -> PyErr {
    let msg = err.to_string();
    match err {
        HeuclassError::InvalidTemplate(_) => PyInvalidTemplateError::new_err(msg),
        HeuclassError::MalformedRecord { .. } => PyMalformedRecordError::new_err(msg),
        HeuclassError::UndeclaredKey(_)
        | HeuclassError::DuplicateKey(_)
        | HeuclassError::DuplicateRule { .. }
        | HeuclassError::InvalidRule(_)
        | HeuclassError::UnknownSite(_)
        | HeuclassError::ConfigError(_) => PyConfigError::new_err(msg),
        HeuclassError::InvalidValue(_)
        | HeuclassError::DicomError(_)
        | HeuclassError::CsvError(_)
        | HeuclassError::IoError(_) => PyInventoryError::new_err(msg),
        HeuclassError::OutputError(_) => PyHeuclassError::new_err(msg),
    }
}
