use crate::error::{HeuclassError, Result};
use crate::types::{ClassificationRule, OutputKey, SequenceRecord};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Series identifiers routed to each output key
///
/// Every key handed to [`classify`] is present, in the order it was
/// declared. A key with no identifiers marks an expected acquisition that
/// was not found in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    entries: Vec<ResultEntry>,
}

/// One key of a classification result with its routed series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub key: OutputKey,
    pub series_ids: Vec<String>,
}

impl ClassificationResult {
    /// Series routed to `key`, or `None` if the key was not declared
    pub fn get(&self, key: &OutputKey) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| entry.series_ids.as_slice())
    }

    /// Entries in key declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    /// Declared keys in order
    pub fn keys(&self) -> impl Iterator<Item = &OutputKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Number of declared keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys no series was routed to
    pub fn missing_keys(&self) -> impl Iterator<Item = &OutputKey> {
        self.entries
            .iter()
            .filter(|entry| entry.series_ids.is_empty())
            .map(|entry| &entry.key)
    }

    /// Total number of routed identifiers, counting fan-out
    pub fn assignment_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.series_ids.len()).sum()
    }
}

impl IntoIterator for ClassificationResult {
    type Item = ResultEntry;
    type IntoIter = std::vec::IntoIter<ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Routes each record to the keys of every rule it satisfies
///
/// Records are visited in input order and rules in declaration order; a
/// record is appended once per matching rule, so one series may land under
/// several keys. Keys repeated in `keys` are kept once, at their first
/// position.
///
/// # Errors
///
/// Returns [`HeuclassError::UndeclaredKey`] before looking at any record if
/// a rule targets a key missing from `keys`, and
/// [`HeuclassError::MalformedRecord`] if a rule inspects an attribute a
/// record does not carry. No partial result is returned.
///
/// # Example
///
/// ```
/// use heuclass_core::{classify, ClassificationRule, OutputKey, Predicate, SequenceRecord};
///
/// let t1w = OutputKey::new("sub-{subject}/anat/sub-{subject}_T1w").unwrap();
/// let flair = OutputKey::new("sub-{subject}/anat/sub-{subject}_FLAIR").unwrap();
///
/// let rules = vec![
///     ClassificationRule::new(Predicate::description_equals("t1_mprage_cor_ND"), t1w.clone()),
///     ClassificationRule::new(Predicate::description_equals("3D_Flair"), flair.clone()),
/// ];
/// let records = vec![
///     SequenceRecord::new("S1").with_description("t1_mprage_cor_ND"),
///     SequenceRecord::new("S2").with_description("3D_Flair"),
///     SequenceRecord::new("S3").with_description("t1_mprage_cor_ND"),
/// ];
///
/// let result = classify(&records, &rules, &[t1w.clone(), flair.clone()]).unwrap();
/// assert_eq!(result.get(&t1w).unwrap(), ["S1", "S3"]);
/// assert_eq!(result.get(&flair).unwrap(), ["S2"]);
/// ```
pub fn classify(
    records: &[SequenceRecord],
    rules: &[ClassificationRule],
    keys: &[OutputKey],
) -> Result<ClassificationResult> {
    let mut entries: Vec<ResultEntry> = Vec::with_capacity(keys.len());
    let mut positions: HashMap<&OutputKey, usize> = HashMap::with_capacity(keys.len());

    for key in keys {
        if !positions.contains_key(key) {
            positions.insert(key, entries.len());
            entries.push(ResultEntry {
                key: key.clone(),
                series_ids: Vec::new(),
            });
        }
    }

    let targets = rules
        .iter()
        .map(|rule| {
            positions
                .get(&rule.target)
                .copied()
                .ok_or_else(|| HeuclassError::UndeclaredKey(rule.target.template().to_string()))
        })
        .collect::<Result<Vec<usize>>>()?;

    for record in records {
        for (rule, &target) in rules.iter().zip(&targets) {
            if rule.matches(record)? {
                debug!("{} matched {}", record.series_id, rule);
                entries[target].series_ids.push(record.series_id.clone());
            }
        }
    }

    Ok(ClassificationResult { entries })
}
