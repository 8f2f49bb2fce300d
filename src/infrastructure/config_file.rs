//! TOML configuration file loading.
//!
//! The file is optional. Every key is optional too, and unknown keys are
//! rejected so that typos surface instead of silently falling back.
//!
//! ```toml
//! # ~/.config/moviematch/config.toml
//! api_url = "http://localhost:3000/api"
//! page_size = 20
//! debounce_ms = 250
//! trace_level = "moviematch=debug"
//! ```

use crate::domain::{MovieMatchError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL of the movie API, e.g. `http://localhost:3000/api`.
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub page_size: Option<u32>,

    /// Debounce delay for catalog text filters, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(default)]
    pub worker_threads: Option<usize>,

    #[serde(default)]
    pub trace_level: Option<String>,

    #[serde(default)]
    pub trace_max_bytes: Option<u64>,

    #[serde(default)]
    pub trace_backups: Option<usize>,

    /// Directory for trace files. `~` is expanded.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Loads the configuration file at `path`.
///
/// A missing file is not an error and yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`MovieMatchError::Config`] when the file exists but cannot be read
/// or is not valid TOML for [`ConfigFile`].
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| MovieMatchError::Config(format!("failed to read {}: {e}", path.display())))?;

    let file = toml::from_str(&contents)
        .map_err(|e| MovieMatchError::Config(format!("invalid TOML in {}: {e}", path.display())))?;

    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config_file(&dir.path().join("config.toml")).unwrap(), None);
    }

    #[test]
    fn parses_known_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"http://api.test/api\"\npage_size = 25\ndebounce_ms = 150").unwrap();

        let parsed = load_config_file(file.path()).unwrap().unwrap();
        assert_eq!(parsed.api_url.as_deref(), Some("http://api.test/api"));
        assert_eq!(parsed.page_size, Some(25));
        assert_eq!(parsed.debounce_ms, Some(150));
        assert_eq!(parsed.worker_threads, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_sise = 25").unwrap();

        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, MovieMatchError::Config(msg) if msg.contains("page_sise")));
    }
}
