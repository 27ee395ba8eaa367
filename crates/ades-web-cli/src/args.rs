use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "ades-web",
    version,
    about = "Render ades analyzer replies the way the ades web page does"
)]
pub struct Args {
    /// Log filter (tracing-subscriber EnvFilter syntax)
    #[arg(long, env = "ADES_WEB_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render an analyzer reply payload
    Render(RenderArgs),
    /// List known rules and their documentation links
    Rules,
    /// Explain a rule and how to address its violations
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// Path to the JSON payload; reads stdin when omitted or "-"
    pub payload: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "html")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Renderer config (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ExplainArgs {
    /// Rule id, e.g. ADES100 (case-insensitive)
    pub rule: String,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Html,
    Text,
    Json,
}
