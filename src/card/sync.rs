//! Mirroring the output tree onto a card
//!
//! Each slot folder on the card is deleted and replaced by a fresh copy of
//! the matching output folder. Only called once every conversion succeeded.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::Slot;
use crate::error::{LoaderError, LoaderResult};

/// Name of the marker file used to test that the card accepts writes
const WRITE_PROBE: &str = ".hoerbert-loader-probe";

#[derive(Debug, Clone)]
pub struct CardSync {
    card_root: PathBuf,
}

impl CardSync {
    pub fn new(card_root: impl Into<PathBuf>) -> Self {
        Self {
            card_root: card_root.into(),
        }
    }

    pub fn card_root(&self) -> &Path {
        &self.card_root
    }

    pub fn slot_dir(&self, slot: Slot) -> PathBuf {
        self.card_root.join(slot.dir_name())
    }

    /// Check that the card root is a directory we can create files in
    pub fn check_writable(&self) -> LoaderResult<()> {
        if !self.card_root.is_dir() {
            return Err(LoaderError::Configuration(format!(
                "cannot write to card path {}: not a directory",
                self.card_root.display()
            )));
        }

        let probe = self.card_root.join(WRITE_PROBE);
        let unwritable = |e: std::io::Error| {
            LoaderError::Configuration(format!(
                "cannot write to card path {}: {}",
                self.card_root.display(),
                e
            ))
        };

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&probe)
            .map_err(unwritable)?;
        fs::remove_file(&probe).map_err(unwritable)?;

        Ok(())
    }

    /// Replace every slot folder on the card with the one from `output_root`
    pub fn load(&self, output_root: &Path) -> LoaderResult<()> {
        for slot in Slot::all() {
            let source = output_root.join(slot.dir_name());
            let target = self.slot_dir(slot);
            self.replace_slot(slot, &source, &target)?;
            log::info!("Loaded button {} onto card", slot);
        }
        Ok(())
    }

    fn replace_slot(&self, slot: Slot, source: &Path, target: &Path) -> LoaderResult<()> {
        let sync_error = |path: &Path, e: std::io::Error| LoaderError::Sync {
            slot,
            path: path.to_path_buf(),
            source: e,
        };

        if target.is_dir() {
            fs::remove_dir_all(target).map_err(|e| sync_error(target, e))?;
        } else if target.exists() {
            fs::remove_file(target).map_err(|e| sync_error(target, e))?;
        }

        copy_dir_recursive(source, target).map_err(|(path, e)| sync_error(&path, e))
    }
}

/// Copy a directory tree, reporting the path that failed
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), (PathBuf, std::io::Error)> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            (path, std::io::Error::other(e))
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| (entry.path().to_path_buf(), std::io::Error::other(e)))?;
        let dest_path = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| (dest_path.clone(), e))?;
        } else {
            fs::copy(entry.path(), &dest_path).map_err(|e| (dest_path.clone(), e))?;
        }
    }

    Ok(())
}
