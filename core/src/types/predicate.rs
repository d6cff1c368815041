use super::record::{RecordField, SequenceRecord};
use crate::error::{HeuclassError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied to a record's file count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
}

impl Comparison {
    /// Applies the comparison as `lhs <op> rhs`
    pub fn holds(&self, lhs: u32, rhs: u32) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
        }
    }

    /// Returns the operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
        }
    }
}

/// Test over one sequence record
///
/// String tests are case-sensitive. Compound tests are conjunctions only;
/// alternatives are written as separate rules targeting the same key.
///
/// # Example
///
/// ```
/// use heuclass_core::{Predicate, SequenceRecord};
///
/// let control = Predicate::description_equals("ss_TE00_TI1700").and(Predicate::files_greater_than(24));
///
/// let full = SequenceRecord::new("9-asl").with_description("ss_TE00_TI1700").with_files(30);
/// let partial = SequenceRecord::new("10-asl").with_description("ss_TE00_TI1700").with_files(12);
///
/// assert!(control.evaluate(&full).unwrap());
/// assert!(!control.evaluate(&partial).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Full-string equality
    Equals { field: RecordField, value: String },

    /// Substring containment
    Contains { field: RecordField, value: String },

    /// File count comparison
    Files { op: Comparison, value: u32 },

    /// Every inner predicate holds
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(field: RecordField, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn contains(field: RecordField, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            value: value.into(),
        }
    }

    pub fn description_equals(value: impl Into<String>) -> Self {
        Self::equals(RecordField::SeriesDescription, value)
    }

    pub fn description_contains(value: impl Into<String>) -> Self {
        Self::contains(RecordField::SeriesDescription, value)
    }

    pub fn protocol_contains(value: impl Into<String>) -> Self {
        Self::contains(RecordField::ProtocolName, value)
    }

    pub fn dir_name_contains(value: impl Into<String>) -> Self {
        Self::contains(RecordField::DcmDirName, value)
    }

    pub fn files_greater_than(value: u32) -> Self {
        Predicate::Files {
            op: Comparison::Gt,
            value,
        }
    }

    /// Conjunction with another predicate, flattening nested conjunctions
    pub fn and(self, other: Predicate) -> Self {
        let mut parts = match self {
            Predicate::All(parts) => parts,
            single => vec![single],
        };
        match other {
            Predicate::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        Predicate::All(parts)
    }

    /// Evaluates the predicate against a record
    ///
    /// Conjunctions evaluate every part before combining, so whether a
    /// missing attribute is reported does not depend on the order the parts
    /// were written in.
    ///
    /// # Errors
    ///
    /// Returns [`HeuclassError::MalformedRecord`] if an inspected attribute
    /// is absent from the record.
    pub fn evaluate(&self, record: &SequenceRecord) -> Result<bool> {
        match self {
            Predicate::Equals { field, value } => Ok(record.text(*field)? == value.as_str()),
            Predicate::Contains { field, value } => Ok(record.text(*field)?.contains(value.as_str())),
            Predicate::Files { op, value } => Ok(op.holds(record.file_count()?, *value)),
            Predicate::All(parts) => {
                let outcomes: Vec<bool> = parts
                    .iter()
                    .map(|p| p.evaluate(record))
                    .collect::<Result<_>>()?;
                Ok(outcomes.into_iter().all(|hit| hit))
            }
        }
    }

    /// Checks that the predicate can be evaluated meaningfully
    ///
    /// An empty conjunction would hold for every record.
    pub fn validate(&self) -> Result<()> {
        match self {
            Predicate::All(parts) if parts.is_empty() => Err(HeuclassError::InvalidRule(
                "empty conjunction matches every record".to_string(),
            )),
            Predicate::All(parts) => parts.iter().try_for_each(Predicate::validate),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { field, value } => write!(f, "{} == '{}'", field, value),
            Predicate::Contains { field, value } => write!(f, "'{}' in {}", value, field),
            Predicate::Files { op, value } => write!(f, "series_files {} {}", op.symbol(), value),
            Predicate::All(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "({})", part)?;
                }
                Ok(())
            }
        }
    }
}
