//! Reading dflow documents from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LoadError;

/// File extension of dflow documents
pub const DFLOW_EXTENSION: &str = "dflow";

/// Read one document as UTF-8 text.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded document");
    Ok(text)
}

/// Recursively collect `.dflow` files under `dir`, sorted by path.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    collect_recursive(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_recursive(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_recursive(&path, paths)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(DFLOW_EXTENSION) {
            paths.push(path);
        }
    }
    Ok(())
}
