//! JSON file snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Snapshot, StateStore};
use crate::error::{Result, StoreError};

/// Stores the snapshot as pretty-printed JSON at a fixed path.
///
/// Writes go to a sibling temp file which is then renamed over the
/// target, so a crash mid-write cannot corrupt the previous snapshot.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot yet, starting fresh");
            return Ok(Snapshot::default());
        }
        let content = fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        let snapshot = serde_json::from_str(&content).map_err(StoreError::Decode)?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        let encoded = serde_json::to_string_pretty(snapshot).map_err(StoreError::Encode)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(StoreError::Write)?;
        fs::rename(&tmp, &self.path).map_err(StoreError::Write)?;

        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
