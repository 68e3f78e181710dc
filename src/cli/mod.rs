use clap::Parser;

/// redteam-report — turn an AI red-teaming JSON report into a shareable HTML page
///
/// Reads the report from a .json file in the current directory, or from stdin
/// when no input (or `-`) is given. The HTML document is always written into
/// the current directory.
#[derive(Parser, Debug)]
#[command(
    name = "redteam-report",
    version,
    about = "Turn an AI red-teaming JSON report into a single HTML document",
    long_about = "Converts a red-teaming JSON report into a self-contained HTML document.\n\nInput and output files are confined to the current directory: any directory\npart of a given path is discarded.\n\nExamples:\n  redteam-report results.json\n  redteam-report results.json summary.html\n  cat results.json | redteam-report - summary.html"
)]
pub struct Cli {
    /// JSON report file in the current directory, or `-` for stdin (default: stdin)
    pub input: Option<String>,

    /// Output HTML file name (default: report.html)
    pub output: Option<String>,

    /// Fixed footer timestamp instead of today's date
    #[arg(long, value_name = "TEXT")]
    pub generated_at: Option<String>,

    /// Ignore .redteam-report.toml config files
    #[arg(long)]
    pub no_config: bool,

    /// Write a default .redteam-report.toml into the current directory and exit
    #[arg(long, conflicts_with_all = ["input", "output"])]
    pub init_config: bool,

    /// Enable verbose output (debug level)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}
