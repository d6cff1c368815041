//! Core type definitions for sequence classification
//!
//! This module provides the fundamental types used throughout the heuclass library:
//! - [`OutputType`]: File types a converted series is written as
//! - [`OutputKey`]: Templated BIDS destination for classified series
//! - [`SequenceRecord`]: One acquired series as seen before conversion
//! - [`Predicate`]: Conditions over a record's description, protocol, directory and file count
//! - [`ClassificationRule`]: A predicate paired with the key it routes matches to

mod key;
mod output_type;
mod predicate;
mod record;
mod rule;

pub use key::{build_key, OutputKey, KNOWN_PLACEHOLDERS};
pub use output_type::{OutputType, DEFAULT_OUTPUT_TYPES};
pub use predicate::{Comparison, Predicate};
pub use record::{RecordField, SequenceRecord, SERIES_FILES};
pub use rule::ClassificationRule;
