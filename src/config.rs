use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::report::html::{self, RenderOptions};

pub const CONFIG_FILE_NAME: &str = ".redteam-report.toml";

/// Tool configuration (loaded from .redteam-report.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Document title
    #[serde(default = "default_title")]
    pub title: String,

    /// Heading shown next to the logo
    #[serde(default = "default_heading")]
    pub heading: String,

    #[serde(default = "default_logo_url")]
    pub logo_url: String,

    /// Footer label
    #[serde(default = "default_product_label")]
    pub product_label: String,

    /// Fixed footer timestamp; the current date is used when unset
    #[serde(default)]
    pub generated_at: Option<String>,

    /// chrono format for the current date
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: default_title(),
            heading: default_heading(),
            logo_url: default_logo_url(),
            product_label: default_product_label(),
            generated_at: None,
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output file name used when none is given on the command line
    #[serde(default = "default_output_file")]
    pub default_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            default_file: default_output_file(),
        }
    }
}

fn default_title() -> String {
    html::DEFAULT_TITLE.to_string()
}

fn default_heading() -> String {
    html::DEFAULT_HEADING.to_string()
}

fn default_logo_url() -> String {
    html::DEFAULT_LOGO_URL.to_string()
}

fn default_product_label() -> String {
    html::DEFAULT_PRODUCT_LABEL.to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_output_file() -> String {
    "report.html".to_string()
}

impl ToolConfig {
    /// Try to load .redteam-report.toml from the working directory.
    ///
    /// Parent directories are never consulted. A broken config file is
    /// reported and skipped, never fatal.
    pub fn load(work_dir: &Path) -> Option<Self> {
        let config_path = find_config_file(work_dir)?;
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<ToolConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", config_path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}", config_path.display(), e);
                None
            }
        }
    }

    /// Build the renderer's static options. `generated_at` from the command
    /// line wins over the config file.
    pub fn render_options(&self, generated_at: Option<&str>) -> RenderOptions {
        let generated_at = match generated_at.or(self.report.generated_at.as_deref()) {
            Some(fixed) => fixed.to_string(),
            None => current_date(&self.report.date_format),
        };

        RenderOptions {
            title: self.report.title.clone(),
            heading: self.report.heading.clone(),
            logo_url: self.report.logo_url.clone(),
            product_label: self.report.product_label.clone(),
            generated_at,
        }
    }
}

/// Format today's local date, falling back to ISO dates for a bad format string
fn current_date(format: &str) -> String {
    use chrono::format::{Item, StrftimeItems};

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        warn!("Invalid date_format '{}', using %Y-%m-%d", format);
        return chrono::Local::now().format("%Y-%m-%d").to_string();
    }
    chrono::Local::now().format(format).to_string()
}

/// Config file in the working directory, if there is one
fn find_config_file(work_dir: &Path) -> Option<PathBuf> {
    let config = work_dir.join(CONFIG_FILE_NAME);
    config.is_file().then_some(config)
}

/// Create a default .redteam-report.toml in the given directory
pub fn init_config(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE_NAME);
        return Ok(());
    }

    let default_config = r#"# Red-team report converter configuration

[report]
# Document title and header heading
# title = "Snyk AI Red Teaming Report"
# heading = "Security Testing Report"

# Logo shown in the header (remote image reference)
# logo_url = "https://example.com/logo.png"

# Footer label
# product_label = "Generated by Snyk Security Testing Tool"

# Fixed footer timestamp. When unset, today's date is used.
# generated_at = "2025-11-10"

# chrono format string for today's date
date_format = "%Y-%m-%d"

[output]
# Output file name when none is given. Always written to the current directory.
default_file = "report.html"
"#;

    std::fs::write(&config_path, default_config)?;
    println!("✅ Created {}", CONFIG_FILE_NAME);
    println!("   Edit it to customize the generated report.");

    Ok(())
}
