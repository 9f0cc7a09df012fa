//! Input folder scaffolding
//!
//! Creates the input root and one folder per button so a fresh setup only
//! needs files dropped in. Existing folders are reused as resolved.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use super::paths::{InputListing, PathResolver, resolve_input_name};
use super::slot::Slot;
use crate::error::{LoaderError, LoaderResult};

/// Marker that keeps otherwise empty folders around (and is hidden from listing)
const KEEP_FILE: &str = ".keep";

/// Create missing input folders. Returns the folder used for each slot.
pub fn setup_input(resolver: &PathResolver) -> LoaderResult<Vec<PathBuf>> {
    let input_root = resolver.input_root();
    fs::create_dir_all(input_root).map_err(|e| {
        LoaderError::Configuration(format!(
            "failed to create input root {}: {}",
            input_root.display(),
            e
        ))
    })?;

    let listing = InputListing::read(input_root)?;
    let mut folders = Vec::with_capacity(Slot::COUNT);

    for slot in Slot::all() {
        let name = resolve_input_name(slot, &listing)
            .unwrap_or_else(|_| OsString::from(slot.default_label()));
        let folder = input_root.join(name);

        let create_error = |e: std::io::Error| {
            LoaderError::Configuration(format!(
                "failed to set up input folder for button {} ({}): {}",
                slot,
                folder.display(),
                e
            ))
        };

        if !folder.exists() {
            fs::create_dir(&folder).map_err(create_error)?;
            log::info!("Created input folder {}", folder.display());
        }

        let keep = folder.join(KEEP_FILE);
        if !keep.exists() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&keep)
                .map_err(create_error)?;
        }

        folders.push(folder);
    }

    Ok(folders)
}
