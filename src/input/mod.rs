pub mod paths;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConvertError;

/// Argument that selects stdin explicitly
pub const STDIN_SENTINEL: &str = "-";

/// Where report bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

/// Input and output locations for one conversion run, both inside the
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source: Source,
    pub output: PathBuf,
}

impl Invocation {
    /// Pick the input mode from the positional arguments and sanitize both paths.
    ///
    /// A missing input or `-` reads stdin. Anything else must name a `.json`
    /// file in `work_dir`.
    pub fn resolve(
        input: Option<&str>,
        output: Option<&str>,
        default_output: &str,
        work_dir: &Path,
    ) -> Result<Self, ConvertError> {
        let source = match input {
            None | Some(STDIN_SENTINEL) => Source::Stdin,
            Some(path) => Source::File(paths::resolve_input_path(path, work_dir)?),
        };
        let output = paths::resolve_output_path(output.unwrap_or(default_output), work_dir)?;

        Ok(Invocation { source, output })
    }
}

/// Current working directory, the root for every path this tool touches
pub fn working_dir() -> Result<PathBuf, ConvertError> {
    std::env::current_dir().map_err(ConvertError::WorkDir)
}

/// Read all report bytes from the selected source; `stdin` is only
/// consumed in stdin mode.
pub fn read_source<R: Read>(source: &Source, stdin: R) -> Result<Vec<u8>, ConvertError> {
    match source {
        Source::Stdin => {
            info!("Reading from stdin...");
            read_stream(stdin)
        }
        Source::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| ConvertError::ReadInput {
                path: path.clone(),
                source,
            })?;
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>, ConvertError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(ConvertError::Stdin)?;
    debug!("Read {} bytes from stdin", bytes.len());
    Ok(bytes)
}

/// Write the rendered document, replacing any existing file.
///
/// The handle is flushed before returning and closed on every path out.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ConvertError> {
    let write_err = |source: std::io::Error| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!("Report written to {}", path.display());
    Ok(())
}
