use std::collections::BTreeMap;

use crate::report::model::{Problem, Report};

/// Human-readable report.
///
/// Problems are grouped by job (sorted by name). Problems outside any job
/// come first and get no job heading.
pub fn render_text(report: &Report) -> String {
    let problems = match report {
        Report::Error(err) => return format!("Error: {}\n{}\n", err.summary, err.details),
        Report::Problems(problems) if problems.is_empty() => return "Ok\n".to_string(),
        Report::Problems(problems) => problems,
    };

    let mut by_job: BTreeMap<&str, Vec<&Problem>> = BTreeMap::new();
    for p in problems {
        by_job.entry(p.job.as_str()).or_default().push(p);
    }

    let mut out = format!("Detected {} violation(s):\n", problems.len());
    for (job, problems) in by_job {
        if !job.is_empty() {
            out.push_str(&format!("  {} in job {:?}:\n", problems.len(), job));
        }
        for p in problems {
            out.push_str(&format!(
                "    step {:?} contains {:?} ({})\n",
                p.step, p.problem, p.rule
            ));
        }
    }
    out
}
