use super::engine::{classify, ClassificationResult};
use super::sites;
use crate::error::{HeuclassError, Result};
use crate::types::{build_key, ClassificationRule, OutputKey, OutputType, Predicate, SequenceRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Output key declaration in a heuristic file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Name rules use to refer to the key
    pub name: String,

    /// Output path template
    pub template: Option<String>,

    /// Output file types, compressed NIfTI when empty
    #[serde(default)]
    pub outtype: Vec<OutputType>,

    /// Annotation classes
    #[serde(default)]
    pub annotation_classes: Option<Vec<String>>,
}

/// Rule declaration in a heuristic file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the target key
    pub key: String,

    /// Predicate a series must satisfy
    pub when: Predicate,
}

/// Heuristic as written on disk, before validation
///
/// # Example
///
/// ```
/// use heuclass_core::{HeuristicConfig, Predicate, SequenceRecord};
///
/// let heuristic = HeuristicConfig::new("site-a")
///     .key("t1w", "sub-{subject}/{session}/anat/sub-{subject}_{session}_T1w")
///     .key("flair", "sub-{subject}/{session}/anat/sub-{subject}_{session}_FLAIR")
///     .rule("t1w", Predicate::description_equals("t1_mprage_cor_ND"))
///     .rule("flair", Predicate::description_equals("t2_spc_da-fl_sag_ND"))
///     .build()
///     .unwrap();
///
/// let records = vec![SequenceRecord::new("4-t1").with_description("t1_mprage_cor_ND")];
/// let result = heuristic.classify(&records).unwrap();
///
/// assert_eq!(result.get(heuristic.key("t1w").unwrap()).unwrap(), ["4-t1"]);
/// assert!(result.get(heuristic.key("flair").unwrap()).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeuristicConfig {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<KeyConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl HeuristicConfig {
    /// Creates an empty configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Builder: Declare a compressed NIfTI key
    pub fn key(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.keys.push(KeyConfig {
            name: name.into(),
            template: Some(template.into()),
            outtype: Vec::new(),
            annotation_classes: None,
        });
        self
    }

    /// Builder: Declare a key with explicit output types and annotation classes
    pub fn key_with(
        mut self,
        name: impl Into<String>,
        template: impl Into<String>,
        outtype: Vec<OutputType>,
        annotation_classes: Option<Vec<String>>,
    ) -> Self {
        self.keys.push(KeyConfig {
            name: name.into(),
            template: Some(template.into()),
            outtype,
            annotation_classes,
        });
        self
    }

    /// Builder: Append a rule
    pub fn rule(mut self, key: impl Into<String>, when: Predicate) -> Self {
        self.rules.push(RuleConfig {
            key: key.into(),
            when,
        });
        self
    }

    /// Validates the configuration and resolves rule targets
    ///
    /// # Errors
    ///
    /// - [`HeuclassError::InvalidTemplate`] for an unusable key template
    /// - [`HeuclassError::DuplicateKey`] when two keys share a name
    /// - [`HeuclassError::UndeclaredKey`] when a rule names an unknown key
    /// - [`HeuclassError::InvalidRule`] for an empty conjunction
    /// - [`HeuclassError::DuplicateRule`] when a rule repeats an earlier one
    pub fn build(self) -> Result<Heuristic> {
        let mut names = HashSet::new();
        let mut keys = Vec::with_capacity(self.keys.len());

        for key in self.keys {
            if !names.insert(key.name.clone()) {
                return Err(HeuclassError::DuplicateKey(key.name));
            }
            let output_key =
                build_key(key.template.as_deref(), key.outtype, key.annotation_classes).map_err(
                    |e| match e {
                        HeuclassError::InvalidTemplate(msg) => {
                            HeuclassError::InvalidTemplate(format!("key '{}': {}", key.name, msg))
                        }
                        other => other,
                    },
                )?;
            keys.push(NamedKey {
                name: key.name,
                key: output_key,
            });
        }

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.rules.len());

        for (index, rule) in self.rules.into_iter().enumerate() {
            let target = keys
                .iter()
                .find(|named| named.name == rule.key)
                .ok_or_else(|| HeuclassError::UndeclaredKey(rule.key.clone()))?;

            rule.when.validate()?;

            if !seen.insert((rule.key.clone(), rule.when.clone())) {
                return Err(HeuclassError::DuplicateRule {
                    key: rule.key,
                    index,
                });
            }

            rules.push(ClassificationRule::new(rule.when, target.key.clone()));
        }

        debug!(
            "Built heuristic '{}' with {} keys and {} rules",
            self.name,
            keys.len(),
            rules.len()
        );

        Ok(Heuristic {
            name: self.name,
            keys,
            rules,
        })
    }
}

/// Output key with the name rules refer to it by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedKey {
    pub name: String,
    pub key: OutputKey,
}

/// Validated key catalog and rule table for one acquisition site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heuristic {
    name: String,
    keys: Vec<NamedKey>,
    rules: Vec<ClassificationRule>,
}

impl Heuristic {
    /// Parses and validates a heuristic from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: HeuristicConfig = serde_json::from_str(json)?;
        config.build()
    }

    /// Reads and validates a heuristic JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let heuristic = Self::from_json(&text)?;
        info!(
            "Loaded heuristic '{}' from {}",
            heuristic.name,
            path.display()
        );
        Ok(heuristic)
    }

    /// Returns one of the heuristics shipped with the crate
    ///
    /// # Example
    ///
    /// ```
    /// use heuclass_core::Heuristic;
    ///
    /// let hchs = Heuristic::builtin("hchs").unwrap();
    /// assert_eq!(hchs.key_names().collect::<Vec<_>>(), ["t1w", "t2w", "flair", "dwi", "func_rest"]);
    /// assert!(Heuristic::builtin("nowhere").is_err());
    /// ```
    pub fn builtin(site: &str) -> Result<Self> {
        let json =
            sites::source(site).ok_or_else(|| HeuclassError::UnknownSite(site.to_string()))?;
        Self::from_json(json)
    }

    /// Names of the built-in heuristics
    pub fn builtin_sites() -> impl Iterator<Item = &'static str> {
        sites::names()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Named keys in declaration order
    pub fn named_keys(&self) -> &[NamedKey] {
        &self.keys
    }

    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|named| named.name.as_str())
    }

    /// Looks up a key by name
    pub fn key(&self, name: &str) -> Option<&OutputKey> {
        self.keys
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.key)
    }

    /// Name of a key, if it belongs to this heuristic
    pub fn name_of(&self, key: &OutputKey) -> Option<&str> {
        self.keys
            .iter()
            .find(|named| &named.key == key)
            .map(|named| named.name.as_str())
    }

    /// Output keys in declaration order
    pub fn output_keys(&self) -> Vec<OutputKey> {
        self.keys.iter().map(|named| named.key.clone()).collect()
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classifies a session's records with this heuristic
    pub fn classify(&self, records: &[SequenceRecord]) -> Result<ClassificationResult> {
        let result = classify(records, &self.rules, &self.output_keys())?;
        info!(
            "Heuristic '{}' routed {} of {} series, {} keys without match",
            self.name,
            result.assignment_count(),
            records.len(),
            result.missing_keys().count()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordField;

    fn asl_config() -> HeuristicConfig {
        HeuristicConfig::new("asl")
            .key("control_asl", "sub-{subject}/{session}/perf/sub-{subject}_{session}_run-1_asl")
            .key("label_asl", "sub-{subject}/{session}/perf/sub-{subject}_{session}_run-2_asl")
            .key("m0scan", "sub-{subject}/{session}/perf/sub-{subject}_{session}_m0scan")
            .rule(
                "control_asl",
                Predicate::description_equals("ss_TE00_TI1700").and(Predicate::files_greater_than(24)),
            )
            .rule("label_asl", Predicate::description_equals("ns_TE00_TI1700"))
            .rule("m0scan", Predicate::protocol_contains("M0"))
    }

    #[test]
    fn test_build_resolves_targets() {
        let heuristic = asl_config().build().unwrap();
        assert_eq!(heuristic.rules().len(), 3);
        assert_eq!(
            &heuristic.rules()[2].target,
            heuristic.key("m0scan").unwrap()
        );
        assert_eq!(
            heuristic.name_of(heuristic.key("label_asl").unwrap()),
            Some("label_asl")
        );
    }

    #[test]
    fn test_classify_compound_rule() {
        let heuristic = asl_config().build().unwrap();
        let records = vec![
            SequenceRecord::new("12-ss")
                .with_description("ss_TE00_TI1700")
                .with_protocol("pcasl")
                .with_files(12),
            SequenceRecord::new("13-ss")
                .with_description("ss_TE00_TI1700")
                .with_protocol("pcasl")
                .with_files(48),
            SequenceRecord::new("14-ns")
                .with_description("ns_TE00_TI1700")
                .with_protocol("pcasl")
                .with_files(48),
            SequenceRecord::new("15-m0")
                .with_description("M0")
                .with_protocol("pcasl_M0")
                .with_files(1),
        ];

        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("control_asl").unwrap()).unwrap(), ["13-ss"]);
        assert_eq!(result.get(heuristic.key("label_asl").unwrap()).unwrap(), ["14-ns"]);
        assert_eq!(result.get(heuristic.key("m0scan").unwrap()).unwrap(), ["15-m0"]);
    }

    #[test]
    fn test_missing_template() {
        let mut config = asl_config();
        config.keys[0].template = None;
        let err = config.build().unwrap_err();
        assert!(matches!(err, HeuclassError::InvalidTemplate(msg) if msg.contains("control_asl")));
    }

    #[test]
    fn test_duplicate_key_name() {
        let err = asl_config()
            .key("m0scan", "sub-{subject}/perf/sub-{subject}_m0scan")
            .build()
            .unwrap_err();
        assert!(matches!(err, HeuclassError::DuplicateKey(name) if name == "m0scan"));
    }

    #[test]
    fn test_undeclared_key() {
        let err = asl_config()
            .rule("dwi", Predicate::description_contains("diff"))
            .build()
            .unwrap_err();
        assert!(matches!(err, HeuclassError::UndeclaredKey(name) if name == "dwi"));
    }

    #[test]
    fn test_duplicate_rule() {
        let err = asl_config()
            .rule("label_asl", Predicate::description_equals("ns_TE00_TI1700"))
            .build()
            .unwrap_err();
        assert!(matches!(err, HeuclassError::DuplicateRule { index: 3, .. }));
    }

    #[test]
    fn test_same_predicate_for_two_keys_is_fan_out() {
        let heuristic = HeuristicConfig::new("fan-out")
            .key("dwi", "sub-{subject}/dwi/sub-{subject}_dwi")
            .key("dwi_clinical", "sub-{subject}/dwi/sub-{subject}_desc-clinical_dwi")
            .rule("dwi", Predicate::dir_name_contains("DWI"))
            .rule("dwi_clinical", Predicate::dir_name_contains("DWI"))
            .build()
            .unwrap();

        let records = vec![SequenceRecord::new("1").with_dir_name("DWI")];
        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.assignment_count(), 2);
    }

    #[test]
    fn test_empty_conjunction_rejected() {
        let err = asl_config()
            .rule("m0scan", Predicate::All(Vec::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, HeuclassError::InvalidRule(_)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "wu",
            "keys": [
                {"name": "flair", "template": "sub-{subject}/{session}/anat/sub-{subject}_{session}_FLAIR"},
                {"name": "dwi", "template": "sub-{subject}/{session}/dwi/sub-{subject}_{session}_dwi",
                 "outtype": ["dicom", "nii.gz"]}
            ],
            "rules": [
                {"key": "flair", "when": {"contains": {"field": "dcm_dir_name", "value": "FLAIR"}}},
                {"key": "dwi", "when": {"contains": {"field": "dcm_dir_name", "value": "DTI"}}}
            ]
        }"#;

        let heuristic = Heuristic::from_json(json).unwrap();
        assert_eq!(heuristic.name(), "wu");
        assert_eq!(
            heuristic.key("dwi").unwrap().outtype(),
            &[OutputType::Dicom, OutputType::NiiGz]
        );
        assert_eq!(
            heuristic.rules()[0].predicate,
            Predicate::contains(RecordField::DcmDirName, "FLAIR")
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let json = r#"{
            "name": "broken",
            "keys": [{"name": "t1w", "template": "sub-{subject}/anat/sub-{subject}_T1w"}],
            "rules": [{"key": "t1w", "when": {"equals": {"field": "study_description", "value": "x"}}}]
        }"#;
        let err = Heuristic::from_json(json).unwrap_err();
        assert!(matches!(err, HeuclassError::ConfigError(_)));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = asl_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: HeuristicConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asl.json");
        fs::write(&path, serde_json::to_string_pretty(&asl_config()).unwrap()).unwrap();

        let heuristic = Heuristic::from_file(&path).unwrap();
        assert_eq!(heuristic.name(), "asl");
        assert_eq!(heuristic.key_names().count(), 3);
    }
}
