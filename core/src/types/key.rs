use super::output_type::{OutputType, DEFAULT_OUTPUT_TYPES};
use crate::error::{HeuclassError, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Placeholders the downstream converter knows how to fill
pub const KNOWN_PLACEHOLDERS: [&str; 6] = [
    "subject",
    "session",
    "item",
    "seqitem",
    "bids_subject_session_dir",
    "bids_subject_session_prefix",
];

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::[^{}]*)?\}").expect("Failed to compile regex")
    })
}

/// Destination category for classified series
///
/// A key is the templated output path (relative to the BIDS root, without
/// extension), the file types to produce and optional annotation classes.
/// Keys compare by value, so two keys built from the same arguments are
/// the same destination.
///
/// # Example
///
/// ```
/// use heuclass_core::{build_key, OutputType};
///
/// let t1w = build_key(
///     Some("sub-{subject}/{session}/anat/sub-{subject}_{session}_T1w"),
///     vec![OutputType::NiiGz],
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(
///     t1w.render("01", Some("2")),
///     "sub-01/ses-2/anat/sub-01_ses-2_T1w"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OutputKey {
    template: String,
    outtype: Vec<OutputType>,
    annotation_classes: Option<Vec<String>>,
}

/// Builds an output key, validating its template
///
/// An empty `outtype` falls back to compressed NIfTI.
///
/// # Errors
///
/// Returns [`HeuclassError::InvalidTemplate`] if the template is absent or
/// empty, has unbalanced braces, or names a placeholder the converter does
/// not fill.
pub fn build_key(
    template: Option<&str>,
    outtype: Vec<OutputType>,
    annotation_classes: Option<Vec<String>>,
) -> Result<OutputKey> {
    let template = match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return Err(HeuclassError::InvalidTemplate(
                "template must be a non-empty format string".to_string(),
            ))
        }
    };

    validate_template(template)?;

    let outtype = if outtype.is_empty() {
        DEFAULT_OUTPUT_TYPES.to_vec()
    } else {
        outtype
    };

    Ok(OutputKey {
        template: template.to_string(),
        outtype,
        annotation_classes,
    })
}

fn validate_template(template: &str) -> Result<()> {
    let re = placeholder_regex();

    for caps in re.captures_iter(template) {
        let name = &caps[1];
        if !KNOWN_PLACEHOLDERS.contains(&name) {
            return Err(HeuclassError::InvalidTemplate(format!(
                "unknown placeholder '{{{}}}' in '{}'",
                name, template
            )));
        }
    }

    let stripped = re.replace_all(template, "");
    if stripped.contains('{') || stripped.contains('}') {
        return Err(HeuclassError::InvalidTemplate(format!(
            "unbalanced or empty braces in '{}'",
            template
        )));
    }

    Ok(())
}

impl OutputKey {
    /// Builds a key producing compressed NIfTI output
    pub fn new(template: &str) -> Result<Self> {
        build_key(Some(template), Vec::new(), None)
    }

    /// The output path template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Output file types, in the order the converter should produce them
    pub fn outtype(&self) -> &[OutputType] {
        &self.outtype
    }

    /// Annotation classes attached to this key, if any
    pub fn annotation_classes(&self) -> Option<&[String]> {
        self.annotation_classes.as_deref()
    }

    /// Substitutes subject and session placeholders
    ///
    /// A leading `sub-` on `subject` is dropped since templates carry it.
    /// `session` renders as `ses-<label>` unless it already has the prefix.
    /// Without a session, `{session}` is left in place and the combined
    /// subject/session placeholders render the subject part only.
    /// `{item}` and `{seqitem}` are left for the converter.
    pub fn render(&self, subject: &str, session: Option<&str>) -> String {
        let subject = subject.strip_prefix("sub-").unwrap_or(subject);
        let session = session.map(|s| {
            if s.starts_with("ses-") {
                s.to_string()
            } else {
                format!("ses-{}", s)
            }
        });

        placeholder_regex()
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "subject" => subject.to_string(),
                "session" => session.clone().unwrap_or_else(|| caps[0].to_string()),
                "bids_subject_session_dir" => match &session {
                    Some(ses) => format!("sub-{}/{}", subject, ses),
                    None => format!("sub-{}", subject),
                },
                "bids_subject_session_prefix" => match &session {
                    Some(ses) => format!("sub-{}_{}", subject, ses),
                    None => format!("sub-{}", subject),
                },
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.outtype.iter().map(|t| t.simple_name()).collect();
        write!(f, "{} ({})", self.template, types.join(", "))
    }
}
