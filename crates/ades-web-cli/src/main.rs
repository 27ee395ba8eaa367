use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ades_web_core::analysis::model::read_payload;
use ades_web_core::input::capture::FormState;
use ades_web_core::report::{model::Report, render};
use ades_web_core::rules::catalog::{self, CATALOG, RuleId};
use ades_web_core::{AnalysisRequest, Outcome, Panel, RenderController, Reply, ViewConfig};

mod args;

fn main() -> Result<()> {
    let args = args::Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        args::Command::Render(render_args) => {
            let code = run_render(&render_args)?;
            std::process::exit(code);
        }
        args::Command::Rules => {
            print!("{}", list_rules());
            Ok(())
        }
        args::Command::Explain(explain_args) => {
            print!("{}", catalog::explain(&explain_args.rule)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewConfig> {
    match path {
        Some(path) => Ok(ViewConfig::load(path)?),
        None => Ok(ViewConfig::default()),
    }
}

fn read_outcome(payload: Option<&Path>) -> Result<Outcome> {
    match payload {
        Some(path) if path != Path::new("-") => read_payload(path),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read payload from stdin")?;
            Outcome::from_json(&content).context("failed to decode payload from stdin")
        }
    }
}

fn run_render(args: &args::RenderArgs) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let outcome = read_outcome(args.payload.as_deref())?;
    let report = Report::from_outcome(&outcome);

    let output = match args.format {
        args::OutputFormat::Html => {
            let mut html = replay(outcome, config);
            html.push('\n');
            html
        }
        args::OutputFormat::Text => render::render_text(&report),
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };

    match &args.out {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("failed to write output: {}", path.display()))?,
        None => print!("{output}"),
    }

    Ok(report.exit_code())
}

/// Feed a recorded reply through the page controller and return the
/// rendered results container.
fn replay(outcome: Outcome, config: ViewConfig) -> String {
    let mut controller = RenderController::new(FormState::default(), Panel::default(), config);
    controller.install_analyzer(move |request: AnalysisRequest, reply: Reply| {
        debug!(
            seq = reply.seq(),
            source_len = request.source.len(),
            "replaying recorded reply"
        );
        reply.send(outcome.clone());
    });
    controller.sink().html()
}

fn list_rules() -> String {
    let mut out = String::new();
    for rule in CATALOG {
        let url = RuleId::new(rule.id).map(|id| id.doc_url()).unwrap_or_default();
        out.push_str(&format!("{}  {}\n    {}\n", rule.id, rule.title, url));
    }
    out
}
