pub mod analysis;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod render;
pub mod report;
pub mod rules;

pub const TOOL_NAME: &str = "ades-web";

pub use analysis::invoke::{AnalysisRequest, Analyzer, Completion, Reply};
pub use analysis::model::{AnalysisOptions, Outcome, Violation};
pub use config::ViewConfig;
pub use controller::{Panel, RenderController, ResultsSink, UiEvent};
pub use render::state::RenderState;
pub use rules::catalog::RuleId;
