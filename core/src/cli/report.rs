use crate::classification::{ClassificationResult, Heuristic};
use crate::error::{HeuclassError, Result};
use crate::types::{OutputKey, OutputType};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Text report formatter for a classification result
pub struct TextReport<'a> {
    heuristic: &'a Heuristic,
    result: &'a ClassificationResult,
    subject: Option<&'a str>,
    session: Option<&'a str>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(heuristic: &'a Heuristic, result: &'a ClassificationResult) -> Self {
        Self {
            heuristic,
            result,
            subject: None,
            session: None,
        }
    }

    /// Render destinations for this subject and session
    pub fn with_subject(mut self, subject: Option<&'a str>, session: Option<&'a str>) -> Self {
        self.subject = subject;
        self.session = session;
        self
    }

    /// Destination shown for a key: rendered when a subject is known
    pub fn destination(&self, key: &OutputKey) -> String {
        match self.subject {
            Some(subject) => key.render(subject, self.session),
            None => key.template().to_string(),
        }
    }
}

#[derive(Serialize)]
struct ClassificationJson<'a> {
    heuristic: &'a str,
    keys: Vec<KeyJson<'a>>,
}

#[derive(Serialize)]
struct KeyJson<'a> {
    name: &'a str,
    template: &'a str,
    destination: String,
    outtype: &'a [OutputType],
    annotation_classes: Option<&'a [String]>,
    series_ids: &'a [String],
}

impl<'a> TextReport<'a> {
    /// Every key with its destination and series, as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let keys = self
            .result
            .iter()
            .map(|entry| KeyJson {
                name: self.heuristic.name_of(&entry.key).unwrap_or(""),
                template: entry.key.template(),
                destination: self.destination(&entry.key),
                outtype: entry.key.outtype(),
                annotation_classes: entry.key.annotation_classes(),
                series_ids: &entry.series_ids,
            })
            .collect();

        serde_json::to_string_pretty(&ClassificationJson {
            heuristic: self.heuristic.name(),
            keys,
        })
        .map_err(HeuclassError::OutputError)
    }

    /// Writes `destination<TAB>id,id,...` for each key that received series
    pub fn write_paths<W: Write>(&self, out: &mut W) -> Result<()> {
        for entry in self.result.iter().filter(|e| !e.series_ids.is_empty()) {
            writeln!(
                out,
                "{}\t{}",
                self.destination(&entry.key),
                entry.series_ids.join(",")
            )?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("Classification ({})", self.heuristic.name());
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f)?;

        for entry in self.result.iter() {
            let name = self.heuristic.name_of(&entry.key).unwrap_or("?");
            writeln!(f, "{}: {}", name, self.destination(&entry.key))?;
            if entry.series_ids.is_empty() {
                writeln!(f, "  Not found")?;
            } else {
                writeln!(f, "  Series: {}", entry.series_ids.join(", "))?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Summary")?;
        writeln!(f, "-------")?;
        writeln!(f, "Keys:           {}", self.result.len())?;
        writeln!(
            f,
            "Missing keys:   {}",
            self.result.missing_keys().count()
        )?;
        writeln!(f, "Assignments:    {}", self.result.assignment_count())?;

        Ok(())
    }
}
