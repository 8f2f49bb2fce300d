//! moviematch: a terminal browser for a movie catalog REST API.
//!
//! moviematch lists, filters and pages through movies served by a JSON API,
//! and lets the user add, edit and delete movies and post reviews. The
//! interesting part is the query coordination underneath:
//! - a reactive catalog view whose text filters apply after a debounce
//! - an explicit search view whose filters apply only on `search`
//! - out-of-order responses that can never overwrite newer results
//! - a page that follows the data back when a deletion shrinks the last page
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal runtime (main.rs)                         │  ← stdin, timers, stdout
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Command parsing                                  │
//! │  - Event handling, action dispatching               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Query Layer   │   │ UI Layer      │   │ Worker Layer  │
//! │ (query/)      │   │ (ui/)         │   │ (worker/)     │
//! │ - Debounce    │   │ - Rendering   │   │ - Thread pool │
//! │ - Params      │   │ - Components  │   │ - Messages    │
//! │ - Tracker     │   │               │   │               │
//! │ - Coordinator │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                 │
//!                                       ┌───────────────────┐
//!                                       │ Transport         │
//!                                       │ (transport/)      │
//!                                       │ - JSON envelope   │
//!                                       │ - HTTP client     │
//!                                       └───────────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths and config file (infrastructure/)          │
//! │  - Error types (domain/error)                       │
//! │  - Movie model (domain/movie)                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to a local OTLP file       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Movie types and errors
//! - [`infrastructure`]: Platform paths and the TOML config file
//! - [`query`]: Debounce, query building, request tracking, coordination
//! - [`transport`]: API envelope decoding and the HTTP client
//! - [`worker`]: Thread pool running requests off the event loop
//! - [`ui`]: Plain-text rendering of the view model
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! Settings come from, in increasing precedence: built-in defaults, the TOML
//! file (`~/.config/moviematch/config.toml` or `--config <path>`), and
//! `--set key=value` flags. See [`Config`] for the keys.
//!
//! # Example
//!
//! ```rust
//! use moviematch::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! // Startup loads genres and fetches the first catalog page.
//! let (_, actions) = handle_event(&mut state, &Event::Startup)?;
//! assert!(actions.iter().all(|a| matches!(a, Action::PostToWorker(_))));
//! # Ok::<(), moviematch::MovieMatchError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod query;
pub mod transport;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, ViewMode};
pub use domain::{MovieMatchError, Result};

use infrastructure::{expand_tilde, load_config_file, ConfigFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Runtime configuration.
///
/// # Example
///
/// ```toml
/// api_url = "http://localhost:3000/api"
/// page_size = 10
/// debounce_ms = 300
/// request_timeout_ms = 10000
/// worker_threads = 2
/// trace_level = "info"
/// trace_max_bytes = 10485760
/// trace_backups = 3
/// data_dir = "~/.local/share/moviematch"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the movie API. Default: `http://localhost:3000/api`
    pub api_url: String,

    /// Items requested per page. Default: 10
    pub page_size: u32,

    /// Quiet period before catalog text filters apply, in milliseconds.
    /// Default: 300
    pub debounce_ms: u64,

    /// Per-request timeout in milliseconds. Default: 10000
    pub request_timeout_ms: u64,

    /// Threads serving API requests. Default: 2
    pub worker_threads: usize,

    /// `EnvFilter` directive for tracing. `RUST_LOG` wins when set.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// Trace file size that triggers rotation. Default: 10 MiB
    pub trace_max_bytes: u64,

    /// Rotated trace files kept. Default: 3
    pub trace_backups: usize,

    /// Directory for trace files. Default: the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 10,
            debounce_ms: 300,
            request_timeout_ms: 10_000,
            worker_threads: 2,
            trace_level: None,
            trace_max_bytes: 10 * 1024 * 1024,
            trace_backups: 3,
            data_dir: None,
        }
    }
}

impl Config {
    /// Resolves the configuration from defaults, the file at `path` (or the
    /// default location) and `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`MovieMatchError::Config`] if the file exists but is
    /// unreadable or invalid.
    pub fn load(path: Option<&Path>, overrides: &BTreeMap<String, String>) -> Result<Self> {
        let file = match path.map(expand_tilde).or_else(infrastructure::default_config_path) {
            Some(path) => load_config_file(&path)?.unwrap_or_default(),
            None => ConfigFile::default(),
        };
        Ok(Self::from_file(file).with_overrides(overrides))
    }

    /// Applies the keys present in `file` over the defaults.
    ///
    /// Zero page sizes and worker counts are ignored.
    #[must_use]
    pub fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            api_url: file.api_url.unwrap_or(defaults.api_url),
            page_size: file.page_size.filter(|n| *n > 0).unwrap_or(defaults.page_size),
            debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
            request_timeout_ms: file.request_timeout_ms.unwrap_or(defaults.request_timeout_ms),
            worker_threads: file.worker_threads.filter(|n| *n > 0).unwrap_or(defaults.worker_threads),
            trace_level: file.trace_level,
            trace_max_bytes: file.trace_max_bytes.unwrap_or(defaults.trace_max_bytes),
            trace_backups: file.trace_backups.unwrap_or(defaults.trace_backups),
            data_dir: file.data_dir,
        }
    }

    /// Applies `key=value` overrides from the command line.
    ///
    /// Values that fail to parse leave the current setting unchanged; unknown
    /// keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use moviematch::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::default().with_overrides(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert_eq!(config.debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
            map.get(key).and_then(|s| s.trim().parse().ok())
        }

        if let Some(url) = overrides.get("api_url").filter(|s| !s.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(n) = parsed::<u32>(overrides, "page_size").filter(|n| *n > 0) {
            self.page_size = n;
        }
        if let Some(ms) = parsed(overrides, "debounce_ms") {
            self.debounce_ms = ms;
        }
        if let Some(ms) = parsed(overrides, "request_timeout_ms") {
            self.request_timeout_ms = ms;
        }
        if let Some(n) = parsed::<usize>(overrides, "worker_threads").filter(|n| *n > 0) {
            self.worker_threads = n;
        }
        if let Some(level) = overrides.get("trace_level") {
            self.trace_level = Some(level.clone());
        }
        if let Some(bytes) = parsed(overrides, "trace_max_bytes") {
            self.trace_max_bytes = bytes;
        }
        if let Some(n) = parsed(overrides, "trace_backups") {
            self.trace_backups = n;
        }
        if let Some(dir) = overrides.get("data_dir") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Creates the application state for `config`.
///
/// Nothing is fetched yet; feed [`Event::Startup`] to [`handle_event`] to
/// load genres and the first catalog page.
///
/// # Example
///
/// ```rust
/// use moviematch::{initialize, Config, ViewMode};
///
/// let state = initialize(&Config { page_size: 5, ..Default::default() });
/// assert_eq!(state.view, ViewMode::Catalog);
/// assert_eq!(state.catalog.page_size(), 5);
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        api_url = %config.api_url,
        page_size = config.page_size,
        debounce_ms = config.debounce_ms,
        "initializing moviematch"
    );
    AppState::new(config.page_size, config.debounce())
}
