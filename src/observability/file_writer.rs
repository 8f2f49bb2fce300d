//! Rotating file writer with size-based rotation and backup retention.
//!
//! Trace export appends one JSON document per line. Once the file grows past
//! the configured size it is renamed with a timestamp suffix and a fresh file
//! is started; only the newest backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the file is larger than this.
    pub max_bytes: u64,
    /// Backups retained after rotation.
    pub backups: usize,
}

/// Thread-safe rotating file writer.
///
/// Backups are named `<stem>.json.<unix_nanos>`. The file handle is opened
/// lazily, so construction never touches the filesystem.
pub struct FileWriter {
    file_path: PathBuf,
    policy: RotationPolicy,
    writer: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            file_path,
            policy,
            writer: Mutex::new(None),
        }
    }

    /// Appends `json` plus a newline, rotating first if the file is too big.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors (permissions, disk full) or if another
    /// thread panicked while holding the lock.
    pub fn write_line(&self, json: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        let file = match writer.as_mut() {
            Some(file) => file,
            None => writer.insert(OpenOptions::new().create(true).append(true).open(&self.file_path)?),
        };

        writeln!(file, "{json}")?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        let Ok(metadata) = fs::metadata(&self.file_path) else {
            return Ok(());
        };
        if metadata.len() > self.policy.max_bytes {
            *writer = None;
            self.rotate_files()?;
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        let backup_path = self.file_path.with_extension(format!("json.{stamp}"));
        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Deletes all but the newest `policy.backups` rotated files.
    ///
    /// Individual deletion failures are ignored so one stuck file does not
    /// block the rest.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("trace file has no parent directory"))?;

        let prefix = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| format!("{name}."))
            .ok_or_else(|| io::Error::other("trace file name is not valid UTF-8"))?;

        let mut backups: Vec<(PathBuf, u128)> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stamp = name.strip_prefix(&prefix)?.parse::<u128>().ok()?;
                Some((entry.path(), stamp))
            })
            .collect();

        backups.sort_by(|a, b| b.1.cmp(&a.1));

        for (old_backup, _) in backups.iter().skip(self.policy.backups) {
            let _ = fs::remove_file(old_backup);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
