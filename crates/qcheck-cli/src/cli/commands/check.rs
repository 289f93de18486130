//! Default command: checksum or verify the inputs.

use anyhow::Result;
use qcheck_core::report::StdoutSink;
use qcheck_core::runner;
use qcheck_core::settings::Settings;

/// Run all inputs and print one line per item. Mismatches and unreadable
/// targets are reported, not returned as errors; a manifest that cannot be
/// opened is.
pub fn run_check(settings: &Settings) -> Result<()> {
    let sink = StdoutSink {
        color: settings.color,
    };
    let summary = runner::run(settings, &sink)?;
    if settings.verbose {
        eprintln!("{summary}");
    }
    Ok(())
}
