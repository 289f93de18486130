//! CLI for qcheck.

mod commands;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use qcheck_core::config::{self, ColorChoice, QcheckConfig};
use qcheck_core::settings::{Mode, Settings};
use std::io::IsTerminal;
use std::path::PathBuf;

use commands::{print_completions, print_man, run_check};

/// Top-level CLI: `qcheck [OPTIONS] FILE...`.
#[derive(Debug, Parser)]
#[command(name = "qcheck", version)]
#[command(about = "Parallel CRC-32 checksums and SFV manifest verification", long_about = None)]
pub struct Cli {
    /// Number of checker threads in parallel (default 2, or `threads` from config).
    #[arg(short, long, value_name = "N", value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Verify all input as .sfv manifest files.
    #[arg(short = 'c', long)]
    pub check: bool,

    /// Print a summary line to stderr when done.
    #[arg(short, long)]
    pub verbose: bool,

    /// Colour report lines: auto (terminal only), always, never.
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorArg>,

    /// Never memory-map; read files in chunks.
    #[arg(long)]
    pub no_mmap: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<clap_complete::Shell>,

    /// Print a man page and exit.
    #[arg(long, exclusive = true)]
    pub man: bool,

    /// Files to checksum, or manifests with --check.
    #[arg(value_name = "FILE", required_unless_present_any = ["completions", "man"])]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

fn parse_threads(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("thread count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Merge flags over the config file. Flags win.
    pub fn settings(&self, cfg: &QcheckConfig, stdout_is_terminal: bool) -> Settings {
        let mut settings = Settings::from_config(cfg, stdout_is_terminal);
        settings.input_files = self.files.clone();
        settings.verbose = self.verbose;
        settings.mode = if self.check { Mode::Verify } else { Mode::Checksum };
        if let Some(threads) = self.threads {
            settings.threads = threads.max(1);
        }
        if let Some(color) = self.color {
            settings.color = ColorChoice::from(color).enabled(stdout_is_terminal);
        }
        if self.no_mmap {
            settings.use_mmap = false;
        }
        settings
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }
    if cli.man {
        return print_man();
    }

    let cfg = config::load()?;
    let settings = cli.settings(&cfg, std::io::stdout().is_terminal());
    tracing::debug!("settings: {:?}", settings);
    run_check(&settings)
}

#[cfg(test)]
mod tests;
