use sha2::{Digest, Sha256};

use crate::analysis::model::AnalysisOptions;

/// The two controls the user edits: the workflow text field and the
/// conservative-mode checkbox.
///
/// Implementations must return live values; nothing is cached between reads.
pub trait InputSurface {
    fn text(&self) -> String;
    fn conservative_checked(&self) -> bool;
}

/// In-memory form, used wherever there is no DOM to read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    text: String,
    conservative: bool,
}

impl FormState {
    pub fn new(text: impl Into<String>, conservative: bool) -> Self {
        Self {
            text: text.into(),
            conservative,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_conservative(&mut self, checked: bool) {
        self.conservative = checked;
    }

    /// Flip the checkbox, as a click does. Returns the new state.
    pub fn toggle_conservative(&mut self) -> bool {
        self.conservative = !self.conservative;
        self.conservative
    }
}

impl InputSurface for FormState {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn conservative_checked(&self) -> bool {
        self.conservative
    }
}

/// Workflow source with surrounding whitespace removed. No other
/// normalization: empty or malformed text is the analyzer's problem.
pub fn get_source(surface: &dyn InputSurface) -> String {
    surface.text().trim().to_string()
}

pub fn get_options(surface: &dyn InputSurface) -> AnalysisOptions {
    AnalysisOptions {
        conservative: surface.conservative_checked(),
    }
}

/// Hex-encoded SHA-256 of a captured source, used to correlate an invocation
/// with its reply in logs and reports.
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}
