//! Typed errors for manifest loading and per-file reads.
//!
//! Only `ManifestError` escalates to a failed run. `ReadError` is contained
//! by the worker that hit it and turned into a report line.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A manifest could not be opened or read to the end. Fatal for the run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to open \"{}\" for reading", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read \"{}\"", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A run could not get started.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to spawn any worker thread")]
    Spawn(#[source] std::io::Error),
}

/// A target file could not be checksummed.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot stat {}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed on {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    pub fn path(&self) -> &Path {
        match self {
            ReadError::Metadata { path, .. }
            | ReadError::Open { path, .. }
            | ReadError::Read { path, .. } => path,
        }
    }

    /// Underlying OS error kind (e.g. `NotFound`, `PermissionDenied`).
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            ReadError::Metadata { source, .. }
            | ReadError::Open { source, .. }
            | ReadError::Read { source, .. } => source.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn manifest_open_message_names_path() {
        let err = ManifestError::Open {
            path: PathBuf::from("/x/list.sfv"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "failed to open \"/x/list.sfv\" for reading");
    }

    #[test]
    fn read_error_exposes_path_and_kind() {
        let err = ReadError::Open {
            path: PathBuf::from("gone.bin"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.path(), Path::new("gone.bin"));
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
