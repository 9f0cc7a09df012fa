//! Slot to folder resolution
//!
//! Input folders are matched by naming convention. For slot `N` the resolver
//! tries, in order:
//! 1. a folder named exactly `N`
//! 2. the alphabetically first folder starting with `"N "`
//! 3. the built-in default label, e.g. `"0 - brown"`
//!
//! The matching itself runs over an [`InputListing`] snapshot so it can be
//! tested without touching the disk.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use super::button::Button;
use super::settings::LoaderConfig;
use super::slot::Slot;
use crate::error::{LoaderError, LoaderResult};

/// Names of the direct children of the input root at one point in time
///
/// Names are kept as raw OS strings and ordered bytewise, so a folder whose
/// label is not valid UTF-8 still matches on its leading digit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputListing {
    names: BTreeSet<OsString>,
}

impl InputListing {
    #[allow(dead_code)]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the children of `input_root`
    pub fn read(input_root: &Path) -> LoaderResult<Self> {
        if !input_root.is_dir() {
            return Err(LoaderError::missing("input root", input_root));
        }

        let entries = fs::read_dir(input_root).map_err(|e| {
            LoaderError::Configuration(format!(
                "failed to read input root {}: {}",
                input_root.display(),
                e
            ))
        })?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LoaderError::Configuration(format!(
                    "failed to read entry in {}: {}",
                    input_root.display(),
                    e
                ))
            })?;
            names.insert(entry.file_name());
        }

        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(OsStr::new(name))
    }

    /// Names in bytewise order
    pub fn names(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }
}

/// Pick the input folder name for `slot` from a listing
pub fn resolve_input_name(slot: Slot, listing: &InputListing) -> LoaderResult<OsString> {
    let exact = slot.dir_name();
    if listing.contains(&exact) {
        return Ok(OsString::from(exact));
    }

    let prefix = slot.label_prefix();
    if let Some(labelled) = listing
        .names()
        .find(|name| name.as_encoded_bytes().starts_with(prefix.as_bytes()))
    {
        return Ok(labelled.to_os_string());
    }

    let default_label = slot.default_label();
    if listing.contains(default_label) {
        return Ok(OsString::from(default_label));
    }

    Err(LoaderError::Resolution {
        slot,
        default_label,
    })
}

/// Maps slots onto the input, output and card roots of a [`LoaderConfig`]
#[derive(Debug, Clone)]
pub struct PathResolver {
    input_root: PathBuf,
    output_root: PathBuf,
    card_root: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            input_root: config.input_root(),
            output_root: config.output_root(),
            card_root: config.card_path.clone(),
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn card_root(&self) -> Option<&Path> {
        self.card_root.as_deref()
    }

    pub fn output_dir(&self, slot: Slot) -> PathBuf {
        self.output_root.join(slot.dir_name())
    }

    pub fn card_dir(&self, slot: Slot) -> Option<PathBuf> {
        self.card_root.as_ref().map(|root| root.join(slot.dir_name()))
    }

    /// Resolve one slot against the current state of the input root (used in tests)
    #[allow(dead_code)]
    pub fn input_dir(&self, slot: Slot) -> LoaderResult<PathBuf> {
        let listing = InputListing::read(&self.input_root)?;
        let name = resolve_input_name(slot, &listing)?;
        Ok(self.input_root.join(name))
    }

    /// Resolve all nine buttons from a single snapshot of the input root
    pub fn buttons(&self) -> LoaderResult<Vec<Button>> {
        let listing = InputListing::read(&self.input_root)?;
        self.buttons_from_listing(&listing)
    }

    pub fn buttons_from_listing(&self, listing: &InputListing) -> LoaderResult<Vec<Button>> {
        Slot::all()
            .map(|slot| {
                let name = resolve_input_name(slot, listing)?;
                Ok(Button {
                    slot,
                    input_dir: self.input_root.join(name),
                    output_dir: self.output_dir(slot),
                    card_dir: self.card_dir(slot),
                })
            })
            .collect()
    }
}
