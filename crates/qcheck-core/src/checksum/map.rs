//! Mapped-read capability.
//!
//! A `MapWhole` either hands back a read-only mapping of an entire open file
//! or reports that mapping is unavailable, in which case the reader falls
//! back to buffered reads. Platforms or configurations without mapped I/O
//! use `NoMap`.

use memmap2::{Mmap, MmapOptions};
use std::fs::File;

pub trait MapWhole: Send + Sync {
    /// Map all `len` bytes of `file` read-only, or `None` if not possible.
    fn try_map_whole(&self, file: &File, len: u64) -> Option<Mmap>;
}

/// Memory-maps files with `memmap2` and hints sequential, whole-range access.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryMap;

impl MapWhole for MemoryMap {
    fn try_map_whole(&self, file: &File, len: u64) -> Option<Mmap> {
        // Zero-length mappings are rejected by the OS; the buffered path
        // yields the seed for empty files.
        if len == 0 {
            return None;
        }
        let len = usize::try_from(len).ok()?;

        // SAFETY: read-only mapping of a file we opened read-only. A
        // concurrent writer truncating the file can fault the process; the
        // same holds for any mmap-based reader and is accepted here.
        let map = match unsafe { MmapOptions::new().len(len).map(file) } {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!(error = %e, "mmap unavailable, using buffered reads");
                return None;
            }
        };

        #[cfg(unix)]
        {
            use memmap2::Advice;
            // Hints only.
            let _ = map.advise(Advice::Sequential);
            let _ = map.advise(Advice::WillNeed);
        }

        Some(map)
    }
}

/// Never maps; every file goes through buffered reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMap;

impl MapWhole for NoMap {
    fn try_map_whole(&self, _file: &File, _len: u64) -> Option<Mmap> {
        None
    }
}
