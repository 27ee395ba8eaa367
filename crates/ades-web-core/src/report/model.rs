use serde::{Deserialize, Serialize};

use crate::analysis::model::Outcome;

/// Machine-readable summary of one analyzer reply.
///
/// Serializes as `{"problems": [...]}` or `{"error": {...}}`. Problems keep
/// the order the analyzer reported them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    Problems(Vec<Problem>),
    Error(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rule: String,
    /// Empty when the problem is not scoped to a job.
    pub job: String,
    pub step: String,
    pub problem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub summary: String,
    pub details: String,
}

/// Process exit codes, matching the ades command line tool.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_PROBLEMS: i32 = 2;

impl Report {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Failed { summary, details } => Report::Error(ErrorInfo {
                summary: summary.clone(),
                details: details.clone(),
            }),
            Outcome::Completed(violations) => Report::Problems(
                violations
                    .iter()
                    .map(|v| Problem {
                        rule: v.rule_id().to_string(),
                        job: v.job().unwrap_or_default().to_string(),
                        step: v.step().to_string(),
                        problem: v.problem().to_string(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Error(_) => EXIT_ERROR,
            Report::Problems(problems) if problems.is_empty() => EXIT_SUCCESS,
            Report::Problems(_) => EXIT_PROBLEMS,
        }
    }
}
