use std::path::PathBuf;

use thiserror::Error;

/// Every condition that ends a conversion run. None of them are retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error reading from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Input file must have a .json extension: {0}")]
    InvalidExtension(String),

    #[error("Invalid file name: {0}")]
    InvalidPath(String),

    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("Error reading JSON file {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error getting working directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("Error parsing JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Error executing template: {0}")]
    Render(#[source] std::fmt::Error),

    #[error("Error writing output file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
