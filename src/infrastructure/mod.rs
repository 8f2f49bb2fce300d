//! Infrastructure layer for filesystem and environment interactions.

pub mod config_file;
pub mod paths;

pub use config_file::{load_config_file, ConfigFile};
pub use paths::{default_config_path, expand_tilde, get_data_dir};
