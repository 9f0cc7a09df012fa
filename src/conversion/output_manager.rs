//! Output tree management
//!
//! The output tree is `<base>/output/<slot>/` for the nine slots. It is owned
//! by the current run and rebuilt from empty every time, so nothing from a
//! previous run can leak onto the card.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Slot;
use crate::error::{LoaderError, LoaderResult};

#[derive(Debug, Clone)]
pub struct OutputTree {
    root: PathBuf,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_dir(&self, slot: Slot) -> PathBuf {
        self.root.join(slot.dir_name())
    }

    /// Delete the whole tree and create it again with nine empty slot folders
    pub fn recreate(&self) -> LoaderResult<()> {
        if let Ok(metadata) = fs::symlink_metadata(&self.root) {
            if metadata.is_dir() {
                fs::remove_dir_all(&self.root)
            } else {
                fs::remove_file(&self.root)
            }
            .map_err(|e| self.output_error(&self.root, e))?;
            log::debug!("Removed previous output at {}", self.root.display());
        }

        fs::create_dir_all(&self.root).map_err(|e| self.output_error(&self.root, e))?;

        for slot in Slot::all() {
            let dir = self.slot_dir(slot);
            fs::create_dir(&dir).map_err(|e| self.output_error(&dir, e))?;
        }

        log::info!("Output folder ready: {}", self.root.display());
        Ok(())
    }

    /// Number of converted tracks currently in a slot folder (used in tests)
    #[allow(dead_code)]
    pub fn track_count(&self, slot: Slot) -> LoaderResult<usize> {
        let dir = self.slot_dir(slot);
        let entries = fs::read_dir(&dir).map_err(|e| self.output_error(&dir, e))?;
        Ok(entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .count())
    }

    fn output_error(&self, path: &Path, source: std::io::Error) -> LoaderError {
        LoaderError::Output {
            path: path.to_path_buf(),
            source,
        }
    }
}
