//! Single-file checksum with mapped read and buffered fallback.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::error::ReadError;

use super::map::{MapWhole, MemoryMap, NoMap};
use super::{crc32, CHECKSUM_SEED};

/// Chunk size for the buffered fallback.
pub const CHUNK_SIZE: usize = 4096;

/// Which strategy produced a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    Mapped,
    Buffered,
}

/// Computes whole-file checksums. Shared by reference across worker threads;
/// each call owns its own file handle and mapping.
pub struct ChecksumReader {
    mapper: Box<dyn MapWhole>,
}

impl Default for ChecksumReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumReader {
    /// Reader that tries a memory map first.
    pub fn new() -> Self {
        Self::with_mapper(Box::new(MemoryMap))
    }

    /// Reader that only uses buffered reads.
    pub fn buffered() -> Self {
        Self::with_mapper(Box::new(NoMap))
    }

    /// Pick the strategy from the `mmap` setting.
    pub fn from_mmap_enabled(enabled: bool) -> Self {
        if enabled {
            Self::new()
        } else {
            Self::buffered()
        }
    }

    pub fn with_mapper(mapper: Box<dyn MapWhole>) -> Self {
        Self { mapper }
    }

    /// Checksum of the file at `path`, with the read strategy that produced it.
    pub fn checksum_file(&self, path: &Path) -> Result<(u32, ReadStrategy), ReadError> {
        let len = fs::metadata(path)
            .map_err(|source| ReadError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Mapping and handle are dropped on every return path.
        if let Some(map) = self.mapper.try_map_whole(&file, len) {
            return Ok((crc32(&map, CHECKSUM_SEED), ReadStrategy::Mapped));
        }

        let value = checksum_buffered(file).map_err(|source| ReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((value, ReadStrategy::Buffered))
    }
}

/// Fold `CHUNK_SIZE` reads into a running checksum until EOF.
fn checksum_buffered(mut file: File) -> io::Result<u32> {
    fadvise_sequential(&file);
    let mut buf = [0u8; CHUNK_SIZE];
    let mut value = CHECKSUM_SEED;
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        value = crc32(&buf[..n], value);
    }
    Ok(value)
}

#[cfg(target_os = "linux")]
fn fadvise_sequential(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: advisory call on a valid open descriptor; the result is ignored.
    unsafe {
        libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL);
    }
}

#[cfg(not(target_os = "linux"))]
fn fadvise_sequential(_file: &File) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn empty_file_yields_seed() {
        let f = temp_with(b"");
        assert_eq!(
            ChecksumReader::new().checksum_file(f.path()).unwrap(),
            (CHECKSUM_SEED, ReadStrategy::Buffered)
        );
        assert_eq!(
            ChecksumReader::buffered().checksum_file(f.path()).unwrap(),
            (CHECKSUM_SEED, ReadStrategy::Buffered)
        );
    }

    #[test]
    fn known_content() {
        let f = temp_with(b"123456789");
        let (value, strategy) = ChecksumReader::new()
            .checksum_file(f.path())
            .unwrap();
        assert_eq!(value, 0xCBF4_3926);
        assert_eq!(strategy, ReadStrategy::Mapped);
    }

    #[test]
    fn mapped_and_buffered_agree() {
        // Spans several chunks with a partial tail.
        let body: Vec<u8> = (0u8..251).cycle().take(CHUNK_SIZE * 3 + 17).collect();
        let f = temp_with(&body);
        let (mapped, s1) = ChecksumReader::new()
            .checksum_file(f.path())
            .unwrap();
        let (buffered, s2) = ChecksumReader::buffered()
            .checksum_file(f.path())
            .unwrap();
        assert_eq!(s1, ReadStrategy::Mapped);
        assert_eq!(s2, ReadStrategy::Buffered);
        assert_eq!(mapped, buffered);
        assert_eq!(mapped, crc32(&body, CHECKSUM_SEED));
    }

    #[test]
    fn missing_file_is_metadata_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bin");
        let err = ChecksumReader::new().checksum_file(&path).unwrap_err();
        assert!(matches!(err, ReadError::Metadata { .. }));
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.path(), path.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn directory_is_a_read_error() {
        // Directories stat and open fine but fail on read.
        let dir = tempfile::tempdir().unwrap();
        let err = ChecksumReader::buffered().checksum_file(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::Read { .. }));
    }
}
