//! Platform path resolution for configuration and trace files.
//!
//! Locations follow the platform conventions exposed by the `dirs` crate:
//! `~/.config/moviematch` and `~/.local/share/moviematch` on Linux, the
//! `Library/Application Support` equivalents on macOS, `%APPDATA%` on Windows.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "moviematch";

/// Returns the data directory holding trace files.
///
/// An explicit `override_dir` wins (after tilde expansion). Otherwise the
/// platform data directory is used, falling back to `./.moviematch` when the
/// platform has none.
///
/// # Examples
///
/// ```
/// use moviematch::infrastructure::get_data_dir;
/// use std::path::Path;
///
/// let dir = get_data_dir(Some(Path::new("/tmp/mm")));
/// assert_eq!(dir, Path::new("/tmp/mm"));
/// ```
#[must_use]
pub fn get_data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return expand_tilde(dir);
    }
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".moviematch"), |dir| dir.join(APP_DIR))
}

/// Default location of the TOML configuration file.
///
/// Returns `None` if the platform has no configuration directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use moviematch::infrastructure::expand_tilde;
/// use std::path::Path;
///
/// assert_eq!(expand_tilde(Path::new("/absolute/path")), Path::new("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/traces")), home.join("traces"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }

    #[test]
    fn tilde_inside_path_is_literal() {
        assert_eq!(expand_tilde(Path::new("/srv/~cache")), Path::new("/srv/~cache"));
    }

    #[test]
    fn default_data_dir_ends_with_app_name() {
        let dir = get_data_dir(None);
        assert!(dir.ends_with("moviematch") || dir.ends_with(".moviematch"));
    }

    #[test]
    fn config_path_is_toml_file() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("moviematch/config.toml"));
        }
    }
}
