//! Per-item report lines and where they go.
//!
//! Each report is rendered into one string and written with a single call,
//! so lines from different workers never tear even though their order is
//! nondeterministic.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[37m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Outcome of one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Checksum mode: the file was read.
    Computed { path: PathBuf, checksum: u32 },
    /// Checksum mode: the file could not be read.
    ComputeFailed { path: PathBuf },
    /// Verify mode: the file was read; compare `expected` and `actual`.
    Verified {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },
    /// Verify mode: the listed file could not be read.
    Unreadable { path: PathBuf, expected: u32 },
}

/// Three-way classification; unreadable is never folded into mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Ok,
    Mismatch,
    Unreadable,
}

impl Report {
    pub fn path(&self) -> &Path {
        match self {
            Report::Computed { path, .. }
            | Report::ComputeFailed { path }
            | Report::Verified { path, .. }
            | Report::Unreadable { path, .. } => path,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            Report::Computed { .. } => Verdict::Ok,
            Report::Verified {
                expected, actual, ..
            } if expected == actual => Verdict::Ok,
            Report::Verified { .. } => Verdict::Mismatch,
            Report::ComputeFailed { .. } | Report::Unreadable { .. } => Verdict::Unreadable,
        }
    }

    /// Render as one line, without the trailing newline.
    pub fn render(&self, color: bool) -> String {
        match (self, color) {
            (Report::Computed { path, checksum }, false) => {
                format!("{} {:08X}", display_name(path), checksum)
            }
            (Report::Computed { path, checksum }, true) => {
                format!("{CYAN}{}\t{YELLOW}{:08X}{RESET}", display_name(path), checksum)
            }
            (Report::ComputeFailed { path }, false) => format!("{} ERROR", display_name(path)),
            (Report::ComputeFailed { path }, true) => {
                format!("{CYAN}{}\t{RED}ERROR{RESET}", display_name(path))
            }
            (
                Report::Verified {
                    path,
                    expected,
                    actual,
                },
                false,
            ) => {
                let word = if expected == actual { "OK" } else { "FAIL" };
                format!("{} {:08X}...{:08X} {}", path.display(), expected, actual, word)
            }
            (
                Report::Verified {
                    path,
                    expected,
                    actual,
                },
                true,
            ) => {
                let (tint, word) = if expected == actual {
                    (GREEN, "OK")
                } else {
                    (RED, "FAIL")
                };
                format!(
                    "{CYAN}{}\t{YELLOW}{:08X}{WHITE}...{tint}{:08X}\t{tint}{word}{RESET}",
                    path.display(),
                    expected,
                    actual
                )
            }
            (Report::Unreadable { path, expected }, false) => {
                format!("{} {:08X} ERROR opening file", path.display(), expected)
            }
            (Report::Unreadable { path, expected }, true) => format!(
                "{CYAN}{}\t{YELLOW}{:08X}\t\t{RED}Error opening file{RESET}",
                path.display(),
                expected
            ),
        }
    }
}

/// Final path component, or the whole path when there is none.
fn display_name(path: &Path) -> std::path::Display<'_> {
    path.file_name().map(Path::new).unwrap_or(path).display()
}

/// Receives reports from worker threads as items complete.
pub trait ReportSink: Sync {
    fn emit(&self, report: &Report);
}

/// Writes one line per report to stdout.
#[derive(Debug, Clone, Copy)]
pub struct StdoutSink {
    pub color: bool,
}

impl ReportSink for StdoutSink {
    fn emit(&self, report: &Report) {
        let mut line = report.render(self.color);
        line.push('\n');
        if let Err(e) = io::stdout().lock().write_all(line.as_bytes()) {
            tracing::warn!(error = %e, "failed to write report line");
        }
    }
}
