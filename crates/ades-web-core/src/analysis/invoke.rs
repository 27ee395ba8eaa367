//! The seam between the page and the external analyzer.
//!
//! Each invocation hands the analyzer an [`AnalysisRequest`] and a [`Reply`].
//! The reply is consumed when used, so an analyzer can answer at most once;
//! it may answer synchronously, later, or (if it is broken) never.

use std::sync::mpsc::Sender;

use tracing::{trace, warn};

use crate::analysis::model::{AnalysisOptions, Outcome, Violation};
use crate::error::PayloadError;

/// Input captured for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Monotonically increasing per controller; ties the reply to this request.
    pub seq: u64,
    pub source: String,
    pub options: AnalysisOptions,
}

/// A reply as it travels back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub seq: u64,
    pub outcome: Outcome,
}

/// Single-use handle for answering one request.
#[derive(Debug)]
pub struct Reply {
    seq: u64,
    tx: Sender<Completion>,
}

impl Reply {
    pub(crate) fn new(seq: u64, tx: Sender<Completion>) -> Self {
        Self { seq, tx }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn send(self, outcome: Outcome) {
        let seq = self.seq;
        if self.tx.send(Completion { seq, outcome }).is_err() {
            // Controller is gone; nobody is left to render this.
            trace!(seq, "reply dropped, controller no longer listening");
        }
    }

    pub fn error(self, summary: impl Into<String>, details: impl Into<String>) {
        self.send(Outcome::failed(summary, details));
    }

    pub fn result(self, violations: Vec<Violation>) {
        self.send(Outcome::Completed(violations));
    }

    /// Answer with a raw JSON payload.
    ///
    /// A payload that does not decode is not delivered; the page keeps
    /// whatever it currently shows.
    pub fn payload(self, json: &str) -> Result<(), PayloadError> {
        match Outcome::from_json(json) {
            Ok(outcome) => {
                self.send(outcome);
                Ok(())
            }
            Err(err) => {
                warn!(seq = self.seq, error = %err, "rejected analyzer payload");
                Err(err)
            }
        }
    }
}

/// The external workflow analyzer.
pub trait Analyzer {
    fn analyze(&self, request: AnalysisRequest, reply: Reply);
}

impl<F> Analyzer for F
where
    F: Fn(AnalysisRequest, Reply),
{
    fn analyze(&self, request: AnalysisRequest, reply: Reply) {
        (self)(request, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::RuleId;
    use std::sync::mpsc;

    #[test]
    fn reply_carries_its_sequence_number() {
        let (tx, rx) = mpsc::channel();
        Reply::new(7, tx).error("Parsing failure", "bad yaml");

        let completion = rx.try_recv().unwrap();
        assert_eq!(completion.seq, 7);
        assert_eq!(completion.outcome, Outcome::failed("Parsing failure", "bad yaml"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn result_delivers_violations_in_order() {
        let (tx, rx) = mpsc::channel();
        let violations = vec![
            Violation::new(RuleId::new("ADES101").unwrap(), None, "b", "p2"),
            Violation::new(RuleId::new("ADES100").unwrap(), None, "a", "p1"),
        ];
        Reply::new(1, tx).result(violations.clone());

        assert_eq!(rx.try_recv().unwrap().outcome, Outcome::Completed(violations));
    }

    #[test]
    fn malformed_payload_is_not_delivered() {
        let (tx, rx) = mpsc::channel();
        assert!(Reply::new(3, tx).payload("{not json").is_err());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_receiver_dropped_does_not_panic() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        Reply::new(1, tx).result(vec![]);
    }

    #[test]
    fn closures_are_analyzers() {
        let (tx, rx) = mpsc::channel();
        let analyzer = |request: AnalysisRequest, reply: Reply| {
            assert_eq!(request.source, "on: push");
            reply.result(vec![]);
        };

        analyzer.analyze(
            AnalysisRequest {
                seq: 1,
                source: "on: push".into(),
                options: AnalysisOptions::default(),
            },
            Reply::new(1, tx),
        );

        assert_eq!(rx.try_recv().unwrap().outcome, Outcome::Completed(vec![]));
    }
}
