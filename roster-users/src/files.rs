//! On-disk inventory of player record files.
//!
//! Only the existence of a record file matters here; its contents belong to the
//! persistence layer of the embedding server.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::UserMapConfig;
use crate::error::Result;
use crate::key::{Key, sanitize_file_name};

/// The `userdata` directory and its file naming convention.
#[derive(Debug, Clone)]
pub struct UserFiles {
    dir: PathBuf,
    extension: String,
}

impl UserFiles {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &UserMapConfig) -> Self {
        Self::new(config.userdata_dir(), config.extension.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `name`. Pure, performs no I/O.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize_file_name(name), self.extension))
    }

    /// List every record file and turn its base name into a key.
    ///
    /// Returns `None` when the directory does not exist. Files with other extensions
    /// and base names that are not valid keys are skipped.
    pub async fn scan(&self) -> Result<Option<Vec<Key>>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(dir = %self.dir.display(), "user data directory missing, nothing to scan");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let suffix = format!(".{}", self.extension);
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                debug!(?file_name, "skipping non utf-8 file name");
                continue;
            };
            let Some(base) = file_name.strip_suffix(&suffix) else {
                continue;
            };
            match Key::new(base) {
                Ok(key) => keys.push(key),
                Err(err) => debug!(file_name, %err, "skipping record file"),
            }
        }

        debug!(count = keys.len(), dir = %self.dir.display(), "scanned user data directory");
        Ok(Some(keys))
    }
}
