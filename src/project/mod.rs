//! Loading documents and models from the filesystem.
//!
//! The core library never touches the filesystem; these helpers are the one
//! place that does, for callers holding paths instead of text.

pub mod file_loader;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::hir::{BuildError, Built, Model, ModelBuilder};

pub use file_loader::{DFLOW_EXTENSION, collect_file_paths, load_file};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Build {
        path: PathBuf,
        #[source]
        source: BuildError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Build { path, .. } => path,
        }
    }
}

/// Read and build the document at `path` with default limits.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, LoadError> {
    load_model_with(path, &ModelBuilder::new()).map(|built| built.model)
}

/// Read and build the document at `path` with the given builder.
pub fn load_model_with(path: impl AsRef<Path>, builder: &ModelBuilder) -> Result<Built, LoadError> {
    let path = path.as_ref();
    let text = load_file(path)?;
    builder.build(&text).map_err(|source| LoadError::Build {
        path: path.to_path_buf(),
        source,
    })
}

/// Read several documents in order, ready to be merged.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>, LoadError> {
    paths.iter().map(|p| load_file(p.as_ref())).collect()
}
