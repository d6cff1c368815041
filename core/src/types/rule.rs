use super::key::OutputKey;
use super::predicate::Predicate;
use super::record::SequenceRecord;
use crate::error::Result;
use std::fmt;

/// A predicate paired with the key it routes matching series to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassificationRule {
    pub predicate: Predicate,
    pub target: OutputKey,
}

impl ClassificationRule {
    /// Creates a new rule
    pub fn new(predicate: Predicate, target: OutputKey) -> Self {
        Self { predicate, target }
    }

    /// Checks whether the record satisfies this rule's predicate
    pub fn matches(&self, record: &SequenceRecord) -> Result<bool> {
        self.predicate.evaluate(record)
    }
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.predicate, self.target.template())
    }
}
