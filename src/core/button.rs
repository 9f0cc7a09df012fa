//! Buttons and their playback order
//!
//! A button's input folder is listed without descending into subfolders.
//! Hidden entries are skipped. The remaining entries are either sorted by
//! name or shuffled, and each one is assigned the next `N.WAV` name in the
//! output folder.

use rand::Rng;
use rand::seq::SliceRandom;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use super::slot::Slot;
use crate::error::{LoaderError, LoaderResult};

/// Folder name fragments that switch a button into shuffle mode
const SHUFFLE_MARKERS: &[&str] = &["shuffle", "random"];

/// Extension the device expects on every track
pub const OUTPUT_EXTENSION: &str = "WAV";

/// A slot bound to its resolved folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub slot: Slot,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub card_dir: Option<PathBuf>,
}

/// One file to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Button {
    /// Whether the input folder name asks for random playback order
    pub fn is_shuffle(&self) -> bool {
        self.input_dir
            .file_name()
            .map(|name| is_shuffle_name(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    /// List the input folder and build the ordered conversion tasks
    pub fn files<R>(&self, rng: &mut R) -> LoaderResult<Vec<FileTask>>
    where
        R: Rng + ?Sized,
    {
        let entries = list_visible_entries(self.slot, &self.input_dir)?;
        let ordered = order_entries(entries, self.is_shuffle(), rng);
        Ok(build_tasks(&self.input_dir, &self.output_dir, ordered))
    }
}

/// Case-insensitive check for "shuffle" or "random" in a folder name
pub fn is_shuffle_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SHUFFLE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Names of the non-hidden direct children of `dir`
fn list_visible_entries(slot: Slot, dir: &Path) -> LoaderResult<Vec<OsString>> {
    if !dir.is_dir() {
        return Err(LoaderError::NotADirectory {
            slot,
            path: dir.to_path_buf(),
        });
    }

    let read_error = |e: std::io::Error| {
        LoaderError::Configuration(format!(
            "failed to list input folder for button {} ({}): {}",
            slot,
            dir.display(),
            e
        ))
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let name = entry.map_err(read_error)?.file_name();
        if !is_hidden(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Sort or shuffle entry names
pub fn order_entries<R>(mut entries: Vec<OsString>, shuffle: bool, rng: &mut R) -> Vec<OsString>
where
    R: Rng + ?Sized,
{
    if shuffle {
        entries.shuffle(rng);
    } else {
        entries.sort();
    }
    entries
}

/// Pair each entry with its numbered destination, starting at `0.WAV`
pub fn build_tasks(input_dir: &Path, output_dir: &Path, entries: Vec<OsString>) -> Vec<FileTask> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, name)| FileTask {
            input: input_dir.join(name),
            output: output_dir.join(format!("{}.{}", index, OUTPUT_EXTENSION)),
        })
        .collect()
}
