use std::io::IsTerminal;
use std::path::Path;

use owo_colors::OwoColorize;

use crate::report::summary::SeveritySummary;

/// Print the post-conversion summary to stdout
pub fn render(output_file: &Path, summary: &SeveritySummary) {
    let colored = std::io::stdout().is_terminal();
    for line in summary_lines(output_file, summary, colored) {
        println!("{}", line);
    }
}

fn summary_lines(output_file: &Path, summary: &SeveritySummary, colored: bool) -> Vec<String> {
    let name = output_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_file.display().to_string());

    let high = format!("High: {}", summary.high);
    let medium = format!("Medium: {}", summary.medium);
    let low = format!("Low: {}", summary.low);

    let mut lines = Vec::new();
    if colored {
        lines.push(format!(
            "{} HTML report generated successfully: {}",
            "✓".green().bold(),
            name.bold()
        ));
        lines.push(format!("  Total findings: {}", summary.total.to_string().bold()));
        lines.push(format!(
            "  {} | {} | {}",
            high.red().bold(),
            medium.yellow().bold(),
            low.blue()
        ));
    } else {
        lines.push(format!("✓ HTML report generated successfully: {}", name));
        lines.push(format!("  Total findings: {}", summary.total));
        lines.push(format!("  {} | {} | {}", high, medium, low));
    }

    let unclassified = summary.unclassified();
    if unclassified > 0 {
        let note = format!("  ({} with unrecognized severity)", unclassified);
        lines.push(if colored { note.dimmed().to_string() } else { note });
    }

    lines
}
