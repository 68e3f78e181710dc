use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::ConvertError;

/// Resolve `.` and `..` segments without touching the filesystem.
///
/// `..` segments that climb above the start of a relative path are kept, so
/// callers can tell that the path escapes its base. `..` directly under the
/// root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Confine a user-supplied input path to the working directory.
///
/// Only the final path component is honored: `subdir/report.json` resolves to
/// `<work_dir>/report.json`. Paths that climb out of their base are rejected
/// outright.
pub fn resolve_input_path(raw: &str, work_dir: &Path) -> Result<PathBuf, ConvertError> {
    let normalized = normalize(Path::new(raw));

    if !normalized
        .to_string_lossy()
        .to_lowercase()
        .ends_with(".json")
    {
        return Err(ConvertError::InvalidExtension(raw.to_string()));
    }

    if normalized
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ConvertError::InvalidPath(raw.to_string()));
    }

    let base = safe_file_name(&normalized).ok_or_else(|| ConvertError::InvalidPath(raw.to_string()))?;

    let resolved = work_dir.join(&base);
    debug!("Input '{}' resolved to {}", raw, resolved.display());

    if !resolved.exists() {
        return Err(ConvertError::NotFound(base));
    }

    Ok(resolved)
}

/// Confine an output path to the working directory, forcing an `.html` suffix.
///
/// The target is not checked for existence; an existing file gets overwritten.
/// A path with no file name left after normalization (`.`, `..`, `a/..`) is
/// rejected rather than turned into a dot-named file.
pub fn resolve_output_path(raw: &str, work_dir: &Path) -> Result<PathBuf, ConvertError> {
    let normalized = normalize(Path::new(raw));
    let mut base = normalized
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ConvertError::InvalidPath(raw.to_string()))?;

    if !base.to_lowercase().ends_with(".html") {
        base.push_str(".html");
    }

    let resolved = work_dir.join(base);
    debug!("Output '{}' resolved to {}", raw, resolved.display());
    Ok(resolved)
}

/// Final path component, provided it cannot point anywhere else
fn safe_file_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.contains("..") || name.contains(std::path::MAIN_SEPARATOR) {
        return None;
    }
    Some(name.to_string())
}
