use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default worker thread count.
pub const DEFAULT_THREADS: usize = 2;

/// When report lines carry ANSI colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, stdout_is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => stdout_is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Optional configuration loaded from `~/.config/qcheck/config.toml`.
/// Missing keys take the defaults below; command-line flags win over both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcheckConfig {
    /// Worker threads when `--threads` is not given.
    pub threads: usize,
    /// Colour policy for report lines.
    pub color: ColorChoice,
    /// Try memory-mapped reads before buffered reads.
    pub mmap: bool,
}

impl Default for QcheckConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            color: ColorChoice::Auto,
            mmap: true,
        }
    }
}

/// Existing config file, if any. Nothing is created.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("qcheck")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load the user config, or defaults when there is none.
pub fn load() -> Result<QcheckConfig> {
    match config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(QcheckConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<QcheckConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: QcheckConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = QcheckConfig::default();
        assert_eq!(cfg.threads, 2);
        assert_eq!(cfg.color, ColorChoice::Auto);
        assert!(cfg.mmap);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = QcheckConfig {
            threads: 8,
            color: ColorChoice::Never,
            mmap: false,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: QcheckConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let cfg: QcheckConfig = toml::from_str("color = \"always\"").unwrap();
        assert_eq!(cfg.color, ColorChoice::Always);
        assert_eq!(cfg.threads, DEFAULT_THREADS);
        assert!(cfg.mmap);
    }

    #[test]
    fn config_toml_rejects_unknown_color() {
        assert!(toml::from_str::<QcheckConfig>("color = \"rainbow\"").is_err());
    }

    #[test]
    fn color_choice_resolution() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads = 6\nmmap = false\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.threads, 6);
        assert!(!cfg.mmap);
    }

    #[test]
    fn load_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads = \"many\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }
}
