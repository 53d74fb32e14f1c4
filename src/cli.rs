use clap::{Args, Parser, Subcommand, ValueEnum};
use dcc_lib::engine::MatchPolicy;
use dcc_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcc")]
#[command(
    version,
    about = "Design Conformance Checker - Compare a design node tree against a rendered page",
    long_about = "Design Conformance Checker (DCC)\n\nModes:\n- compare: match rendered page elements against design nodes at each viewport and report geometric/style differences.\n- flatten: list the comparable nodes of a design (nodes with geometry), in depth-first order.\n\nExit codes: 0 = no critical issues, 1 = critical issues found, 2 = error."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (TOML); defaults to ./dcc.toml when present. CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a design against a rendered page across viewports
    Compare(CompareArgs),

    /// Print the comparable nodes of a design
    Flatten(FlattenArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long, help = "Design source (local Figma-format JSON file or Figma URL)")]
    pub design: String,

    #[arg(long, help = "Select a node inside the design (e.g. 1:2)")]
    pub node_id: Option<String>,

    #[arg(
        long,
        conflicts_with = "snapshots",
        required_unless_present = "snapshots",
        help = "Page to render with Playwright (http, https or file URL)"
    )]
    pub url: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory of pre-captured <viewport>.json element snapshots"
    )]
    pub snapshots: Option<PathBuf>,

    #[arg(
        long = "viewport",
        value_name = "NAME=WxH",
        help = "Viewport to check (repeatable; e.g. Mobile=375x667). Defaults to config viewports"
    )]
    pub viewports: Vec<Viewport>,

    #[arg(long, value_name = "RATIO", help = "Rendered pixels per design unit")]
    pub device_pixel_ratio: Option<f64>,

    #[arg(long, value_enum, help = "Matching policy")]
    pub match_policy: Option<MatchPolicyArg>,

    #[arg(long, value_name = "DIR", help = "Directory for report.json and report.html")]
    pub out_dir: Option<PathBuf>,

    #[arg(long, value_name = "SECS", help = "Navigation timeout (seconds) for URL rendering")]
    pub nav_timeout: Option<u64>,

    #[arg(
        long,
        value_name = "SECS",
        help = "Bound (seconds) on browser startup and each viewport capture"
    )]
    pub process_timeout: Option<u64>,

    #[arg(long, help = "Do not write screenshots next to the report")]
    pub no_screenshots: bool,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FlattenArgs {
    #[arg(long, help = "Design source (local Figma-format JSON file or Figma URL)")]
    pub design: String,

    #[arg(long, help = "Select a node inside the design (e.g. 1:2)")]
    pub node_id: Option<String>,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MatchPolicyArg {
    First,
    Best,
}

impl From<MatchPolicyArg> for MatchPolicy {
    fn from(value: MatchPolicyArg) -> Self {
        match value {
            MatchPolicyArg::First => MatchPolicy::First,
            MatchPolicyArg::Best => MatchPolicy::Best,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
