use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PayloadError;
use crate::rules::catalog::RuleId;

/// Options forwarded to the analyzer untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Stricter detection: report only expressions known to be attacker
    /// controlled.
    pub conservative: bool,
}

/// One problem reported by the analyzer.
///
/// Immutable once constructed. `job` is `None` when the violation is not
/// scoped to a named job; the analyzer encodes that as an empty string on
/// the wire, which decodes to `None` as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    rule_id: RuleId,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    job: Option<String>,
    step: String,
    problem: String,
}

impl Violation {
    pub fn new(
        rule_id: RuleId,
        job: Option<String>,
        step: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self {
            rule_id,
            job: job.filter(|j| !j.is_empty()),
            step: step.into(),
            problem: problem.into(),
        }
    }

    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn job(&self) -> Option<&str> {
        self.job.as_deref()
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let job = Option::<String>::deserialize(deserializer)?;
    Ok(job.filter(|j| !j.is_empty()))
}

/// What the analyzer answers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Failed { summary: String, details: String },
    Completed(Vec<Violation>),
}

impl Outcome {
    pub fn failed(summary: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Failed {
            summary: summary.into(),
            details: details.into(),
        }
    }

    /// Decode a reply payload.
    ///
    /// Accepted shapes: a bare array of violations, `{"violations": [...]}`,
    /// or `{"error": {"summary": ..., "details": ...}}`.
    pub fn from_json(payload: &str) -> std::result::Result<Self, PayloadError> {
        let payload: Payload = serde_json::from_str(payload)?;
        Ok(payload.into())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Bare(Vec<Violation>),
    Wrapped { violations: Vec<Violation> },
    Error { error: ErrorPayload },
}

#[derive(Deserialize)]
struct ErrorPayload {
    summary: String,
    #[serde(default)]
    details: String,
}

impl From<Payload> for Outcome {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Bare(violations) | Payload::Wrapped { violations } => {
                Outcome::Completed(violations)
            }
            Payload::Error { error } => Outcome::Failed {
                summary: error.summary,
                details: error.details,
            },
        }
    }
}

/// Read and decode a reply payload stored on disk.
pub fn read_payload(path: &Path) -> Result<Outcome> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read payload: {}", path.display()))?;

    Outcome::from_json(&content)
        .with_context(|| format!("failed to decode payload: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rule(id: &str) -> RuleId {
        RuleId::new(id).unwrap()
    }

    #[test]
    fn decodes_analyzer_records() {
        let outcome = Outcome::from_json(
            r#"[
                {"ruleId": "ADES100", "job": "build", "step": "Greet", "problem": "${{ inputs.name }}"},
                {"ruleId": "ADES101", "job": "", "step": "2", "problem": "${{ github.head_ref }}"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::Completed(vec![
                Violation::new(
                    rule("ADES100"),
                    Some("build".into()),
                    "Greet",
                    "${{ inputs.name }}",
                ),
                Violation::new(rule("ADES101"), None, "2", "${{ github.head_ref }}"),
            ])
        );
    }

    #[test]
    fn empty_job_decodes_as_absent() {
        let outcome =
            Outcome::from_json(r#"[{"ruleId": "ADES100", "job": "", "step": "s", "problem": "p"}]"#)
                .unwrap();
        let Outcome::Completed(violations) = outcome else {
            panic!("expected violations");
        };
        assert_eq!(violations[0].job(), None);
    }

    #[test]
    fn missing_job_decodes_as_absent() {
        let outcome = Outcome::from_json(
            r#"{"violations": [{"ruleId": "ADES100", "step": "s", "problem": "p"}]}"#,
        )
        .unwrap();
        let Outcome::Completed(violations) = outcome else {
            panic!("expected violations");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].job(), None);
    }

    #[test]
    fn decodes_error_payload() {
        let outcome = Outcome::from_json(
            r#"{"error": {"summary": "Parsing failure", "details": "yaml: line 2: mapping values are not allowed"}}"#,
        )
        .unwrap();
        assert_eq!(
            outcome,
            Outcome::failed("Parsing failure", "yaml: line 2: mapping values are not allowed")
        );
    }

    #[test]
    fn rejects_empty_rule_id() {
        let err = Outcome::from_json(r#"[{"ruleId": "", "step": "s", "problem": "p"}]"#);
        assert!(matches!(err, Err(PayloadError::Malformed(_))));
    }

    #[test]
    fn rejects_missing_step() {
        assert!(Outcome::from_json(r#"[{"ruleId": "ADES100", "problem": "p"}]"#).is_err());
    }

    #[test]
    fn options_serialize_with_single_field() {
        let json = serde_json::to_string(&AnalysisOptions { conservative: true }).unwrap();
        assert_eq!(json, r#"{"conservative":true}"#);
    }

    #[test]
    fn constructor_normalizes_empty_job() {
        let v = Violation::new(rule("ADES100"), Some(String::new()), "s", "p");
        assert_eq!(v.job(), None);
    }

    #[test]
    fn read_payload_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"violations": []}"#).unwrap();
        file.flush().unwrap();

        let outcome = read_payload(file.path()).unwrap();
        assert_eq!(outcome, Outcome::Completed(vec![]));
    }

    #[test]
    fn read_payload_missing_file_is_error() {
        assert!(read_payload(Path::new("missing-payload.json")).is_err());
    }
}
