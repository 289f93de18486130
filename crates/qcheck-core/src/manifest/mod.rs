//! Checksum manifest (SFV-style) loading.
//!
//! Each manifest lists `<path> <crc32 hex>` lines. Listed paths are resolved
//! against the manifest's own directory so a manifest can be checked from
//! anywhere.

mod parse;

pub use parse::parse_line;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// One expected checksum from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Listed path joined onto the manifest's directory.
    pub path: PathBuf,
    pub expected: u32,
}

/// Load every manifest in order. Opening or reading any manifest fails the
/// whole call; malformed lines are skipped.
pub fn parse_manifests<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut entries = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            tracing::error!(manifest = %path.display(), error = %source, "cannot open manifest");
            ManifestError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let before = entries.len();
        read_manifest(path, BufReader::new(file), &mut entries)?;
        tracing::debug!(
            manifest = %path.display(),
            entries = entries.len() - before,
            "manifest loaded"
        );
    }
    Ok(entries)
}

/// Append the entries of one manifest read from `reader`. `manifest` is used
/// for path resolution and error reporting.
pub fn read_manifest<R: BufRead>(
    manifest: &Path,
    mut reader: R,
    out: &mut Vec<ManifestEntry>,
) -> Result<(), ManifestError> {
    let base = manifest_dir(manifest);
    let mut line = Vec::new();
    let mut line_no = 0usize;
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| ManifestError::Read {
                path: manifest.to_path_buf(),
                source,
            })?;
        if n == 0 {
            return Ok(());
        }
        line_no += 1;
        match parse_line(&line) {
            Some((listed, expected)) => out.push(ManifestEntry {
                path: base.join(path_from_bytes(listed)),
                expected,
            }),
            None => tracing::debug!(manifest = %manifest.display(), line = line_no, "skipped line"),
        }
    }
}

/// Directory listed paths are relative to: the manifest's parent, or `.`.
pub fn manifest_dir(manifest: &Path) -> &Path {
    match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
