use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a [`RecordStore`](crate::RecordStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database root directory. Created on open if missing.
    pub root: PathBuf,
    /// `fsync` the temporary file before the rename and the collection
    /// directory after it. Without this a commit is atomic but may be lost
    /// on power failure.
    pub sync_writes: bool,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./db"),
            sync_writes: false,
        }
    }
}
