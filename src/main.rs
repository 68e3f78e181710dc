mod cli;
mod config;
mod error;
mod input;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::ToolConfig;
use error::ConvertError;
use input::Invocation;
use report::summary::SeveritySummary;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("redteam_report=debug")
    } else if cli.quiet {
        EnvFilter::new("redteam_report=error")
    } else {
        EnvFilter::new("redteam_report=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    debug!("redteam-report v{}", env!("CARGO_PKG_VERSION"));

    let work_dir = input::working_dir()?;

    if cli.init_config {
        return config::init_config(&work_dir);
    }

    let config = if cli.no_config {
        ToolConfig::default()
    } else {
        ToolConfig::load(&work_dir).unwrap_or_default()
    };

    let conversion = convert(cli, &config, &work_dir, std::io::stdin().lock())?;
    report::terminal::render(&conversion.output, &conversion.summary);

    Ok(())
}

/// Where the document was written and what it summarized
#[derive(Debug)]
struct Conversion {
    output: PathBuf,
    summary: SeveritySummary,
}

/// Resolve paths, parse, render and write. The first failure ends the run,
/// and nothing is written unless the report parsed and rendered.
fn convert<R: Read>(
    cli: &Cli,
    config: &ToolConfig,
    work_dir: &Path,
    stdin: R,
) -> Result<Conversion, ConvertError> {
    let invocation = Invocation::resolve(
        cli.input.as_deref(),
        cli.output.as_deref(),
        &config.output.default_file,
        work_dir,
    )?;

    let bytes = input::read_source(&invocation.source, stdin)?;
    let parsed = report::parser::parse(&bytes)?;

    let summary = SeveritySummary::from_findings(&parsed.results);
    info!(
        "Report '{}': {} findings ({} high, {} medium, {} low)",
        parsed.id, summary.total, summary.high, summary.medium, summary.low
    );

    let options = config.render_options(cli.generated_at.as_deref());
    let html = report::html::render(&parsed, &summary, &options)?;
    input::write_output(&invocation.output, &html)?;

    Ok(Conversion {
        output: invocation.output,
        summary,
    })
}
