//! Whole-file CRC-32 computation.
//!
//! The checksum function is CRC-32 (IEEE) via `crc32fast`. Files are read
//! through a memory map when the platform allows it, else in fixed-size
//! chunks folded into a running value.

mod map;
mod reader;

pub use map::{MapWhole, MemoryMap, NoMap};
pub use reader::{ChecksumReader, ReadStrategy, CHUNK_SIZE};

/// Value of the checksum over zero bytes; also the starting seed.
pub const CHECKSUM_SEED: u32 = 0;

/// Fold `bytes` into a running checksum. `seed` is the value returned for
/// everything before `bytes` (use `CHECKSUM_SEED` to start).
pub fn crc32(bytes: &[u8], seed: u32) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(bytes);
    hasher.finalize()
}
