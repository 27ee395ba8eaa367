//! Wires input events, the analyzer and the results container together.
//!
//! The controller is the single writer of the rendered state. Each
//! invocation is tagged with a sequence number and only the reply to the
//! latest invocation is rendered; replies to superseded invocations are
//! dropped.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, trace, warn};

use crate::analysis::invoke::{AnalysisRequest, Analyzer, Completion, Reply};
use crate::analysis::model::{AnalysisOptions, Violation};
use crate::config::ViewConfig;
use crate::input::capture::{self, InputSurface};
use crate::render::node::Element;
use crate::render::state::{RenderState, Signal};
use crate::render::view;

/// Where rendered results go. Implementations swap the previous root out
/// wholesale; they never merge.
pub trait ResultsSink {
    fn replace(&mut self, root: Element);
}

/// In-memory results container.
#[derive(Debug, Default)]
pub struct Panel {
    current: Option<Element>,
    replacements: u64,
}

impl Panel {
    pub fn current(&self) -> Option<&Element> {
        self.current.as_ref()
    }

    /// Number of times the root has been swapped.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    pub fn html(&self) -> String {
        self.current.as_ref().map(Element::to_html).unwrap_or_default()
    }

    pub fn text(&self) -> String {
        self.current
            .as_ref()
            .map(Element::text_content)
            .unwrap_or_default()
    }
}

impl ResultsSink for Panel {
    fn replace(&mut self, root: Element) {
        self.current = Some(root);
        self.replacements += 1;
    }
}

/// Events that trigger an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    TextChanged,
    ConservativeToggled,
}

pub struct RenderController<I, S> {
    input: I,
    sink: S,
    config: ViewConfig,
    state: RenderState,
    analyzer: Option<Box<dyn Analyzer>>,
    latest_seq: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<I: InputSurface, S: ResultsSink> RenderController<I, S> {
    /// Create a controller and render the idle container.
    pub fn new(input: I, sink: S, config: ViewConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut controller = Self {
            input,
            sink,
            config,
            state: RenderState::Idle,
            analyzer: None,
            latest_seq: 0,
            tx,
            rx,
        };
        controller.render();
        controller
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Sequence number of the most recent invocation, 0 before the first.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn get_source(&self) -> String {
        capture::get_source(&self.input)
    }

    pub fn get_options(&self) -> AnalysisOptions {
        capture::get_options(&self.input)
    }

    pub fn is_analyzer_ready(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Register the analyzer once it has loaded, then analyze whatever is
    /// already in the input field.
    pub fn install_analyzer(&mut self, analyzer: impl Analyzer + 'static) {
        debug!("analyzer installed");
        self.analyzer = Some(Box::new(analyzer));
        self.run_analysis();
    }

    pub fn handle(&mut self, event: UiEvent) -> Option<u64> {
        trace!(?event, "ui event");
        self.run_analysis()
    }

    /// Show `Working`, capture input, and invoke the analyzer if it is
    /// available. Returns the sequence number of the issued request, or
    /// `None` when the analyzer has not loaded yet.
    pub fn run_analysis(&mut self) -> Option<u64> {
        self.latest_seq += 1;
        let seq = self.latest_seq;

        self.transition(Signal::Started);

        let source = self.get_source();
        let options = self.get_options();

        let Some(analyzer) = self.analyzer.as_ref() else {
            trace!(seq, "analyzer not loaded, skipping");
            return None;
        };

        debug!(
            seq,
            fingerprint = %capture::fingerprint(&source),
            source_len = source.len(),
            conservative = options.conservative,
            "invoking analyzer"
        );

        let request = AnalysisRequest {
            seq,
            source,
            options,
        };
        analyzer.analyze(request, Reply::new(seq, self.tx.clone()));

        // Pick up replies from analyzers that answer synchronously.
        self.pump();
        Some(seq)
    }

    /// Render every reply that has arrived so far. Returns how many were
    /// rendered (stale replies are not counted).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Render `completion` if it answers the latest invocation.
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.seq != self.latest_seq {
            warn!(
                seq = completion.seq,
                latest = self.latest_seq,
                "discarding stale analyzer reply"
            );
            return false;
        }

        debug!(seq = completion.seq, "rendering analyzer reply");
        self.transition(Signal::Replied(completion.outcome));
        true
    }

    pub fn show_working(&mut self) {
        self.set_state(RenderState::Working);
    }

    pub fn show_error(&mut self, summary: impl Into<String>, details: impl Into<String>) {
        self.set_state(RenderState::Error {
            summary: summary.into(),
            details: details.into(),
        });
    }

    pub fn show_result(&mut self, violations: Vec<Violation>) {
        self.set_state(RenderState::Result(violations));
    }

    /// Apply `signal` and render. Returns the names of the states left and
    /// entered.
    fn transition(&mut self, signal: Signal) -> (&'static str, &'static str) {
        let prev = std::mem::take(&mut self.state);
        let from = prev.name();
        let next = prev.next(signal);
        self.replace_state(from, next)
    }

    fn set_state(&mut self, state: RenderState) {
        let from = self.state.name();
        self.replace_state(from, state);
    }

    fn replace_state(
        &mut self,
        from: &'static str,
        state: RenderState,
    ) -> (&'static str, &'static str) {
        let to = state.name();
        trace!(from, to, "render");
        self.state = state;
        self.render();
        (from, to)
    }

    fn render(&mut self) {
        let root = view::render(&self.state, &self.config);
        self.sink.replace(root);
    }
}
