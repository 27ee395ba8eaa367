use crate::analysis::model::{Outcome, Violation};

/// What the results container shows. Exactly one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    Working,
    Error { summary: String, details: String },
    Result(Vec<Violation>),
}

/// Inputs that move the renderer between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// An invocation was issued.
    Started,
    /// The analyzer answered the latest invocation.
    Replied(Outcome),
}

impl RenderState {
    /// Next state for `signal`.
    ///
    /// The previous state is consumed and never merged into the next one:
    /// every transition is a full replacement.
    pub fn next(self, signal: Signal) -> RenderState {
        match signal {
            Signal::Started => RenderState::Working,
            Signal::Replied(outcome) => outcome.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderState::Idle => "idle",
            RenderState::Working => "working",
            RenderState::Error { .. } => "error",
            RenderState::Result(_) => "result",
        }
    }
}

impl From<Outcome> for RenderState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Failed { summary, details } => RenderState::Error { summary, details },
            Outcome::Completed(violations) => RenderState::Result(violations),
        }
    }
}
