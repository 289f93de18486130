//! Run configuration, built once at startup and read-only afterwards.

use std::path::PathBuf;

use crate::config::{QcheckConfig, DEFAULT_THREADS};

/// What the input files are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Inputs are targets; print their checksums.
    #[default]
    Checksum,
    /// Inputs are manifests; verify the files they list.
    Verify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_files: Vec<PathBuf>,
    pub threads: usize,
    pub verbose: bool,
    pub mode: Mode,
    /// Emit ANSI colour in report lines.
    pub color: bool,
    /// Try memory-mapped reads first.
    pub use_mmap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            threads: DEFAULT_THREADS,
            verbose: false,
            mode: Mode::Checksum,
            color: false,
            use_mmap: true,
        }
    }
}

impl Settings {
    /// Settings seeded from the config file; the caller overrides from flags.
    /// A zero thread count is raised to one.
    pub fn from_config(cfg: &QcheckConfig, stdout_is_terminal: bool) -> Self {
        Self {
            threads: cfg.threads.max(1),
            color: cfg.color.enabled(stdout_is_terminal),
            use_mmap: cfg.mmap,
            ..Self::default()
        }
    }

    /// Worker count actually spawned (never zero).
    pub fn worker_count(&self) -> usize {
        self.threads.max(1)
    }
}
