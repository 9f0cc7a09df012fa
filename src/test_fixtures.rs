//! Test fixtures for loader tests
//!
//! Builds throwaway base directories and provides a stand-in for sox so the
//! pipeline can run without the real tool installed.

#![cfg(test)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::conversion::Transcoder;
use crate::core::{FileTask, LoaderConfig, Slot};
use crate::error::{LoaderError, LoaderResult};

/// A temporary `<base>` directory with helpers to populate `input/`
pub struct LoaderFixture {
    temp_dir: TempDir,
}

impl LoaderFixture {
    /// Empty base directory (no `input/` yet)
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp base directory"),
        }
    }

    /// Base directory with an empty `input/<n>` folder for every slot
    pub fn with_all_slots() -> Self {
        let fixture = Self::new();
        for slot in Slot::all() {
            fixture.add_input(&slot.dir_name(), &[]);
        }
        fixture
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn input_root(&self) -> PathBuf {
        self.base().join("input")
    }

    pub fn output_dir(&self, slot: u8) -> PathBuf {
        self.base().join("output").join(slot.to_string())
    }

    pub fn config(&self) -> LoaderConfig {
        LoaderConfig::new(self.base(), None)
    }

    /// Create `input/<folder>` holding files whose contents are their own names
    pub fn add_input(&self, folder: &str, files: &[&str]) -> PathBuf {
        let dir = self.input_root().join(folder);
        fs::create_dir_all(&dir).expect("Failed to create input folder");
        for name in files {
            fs::write(dir.join(name), name.as_bytes()).expect("Failed to write input file");
        }
        dir
    }

    /// Create (or return) a card directory next to the base
    pub fn card(&self) -> PathBuf {
        let card = self.base().join("card");
        fs::create_dir_all(&card).expect("Failed to create card directory");
        card
    }

    /// Sorted file names in a directory
    pub fn list(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("Failed to read directory")
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// Transcoder that copies the source bytes to the destination
///
/// Can be told to fail on one particular source file, and records every task
/// it was handed in order.
pub struct CopyTranscoder {
    available: bool,
    fail_on: Option<PathBuf>,
    calls: RefCell<Vec<FileTask>>,
}

impl CopyTranscoder {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A transcoder that preflight cannot find
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn failing_on(source: impl Into<PathBuf>) -> Self {
        Self {
            fail_on: Some(source.into()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<FileTask> {
        self.calls.borrow().clone()
    }
}

impl Transcoder for CopyTranscoder {
    fn locate(&self) -> LoaderResult<PathBuf> {
        if self.available {
            Ok(PathBuf::from("copy-transcoder"))
        } else {
            Err(LoaderError::Configuration(
                "cannot find 'copy-transcoder' command".to_string(),
            ))
        }
    }

    fn transcode(&self, task: &FileTask) -> LoaderResult<()> {
        self.calls.borrow_mut().push(task.clone());

        if self.fail_on.as_deref() == Some(task.input.as_path()) {
            return Err(LoaderError::Conversion {
                input: task.input.clone(),
                output: task.output.clone(),
                status: "exit status: 2".to_string(),
                stdout: String::new(),
                stderr: "sox FAIL formats: can't open input file".to_string(),
            });
        }

        fs::copy(&task.input, &task.output).map_err(|e| LoaderError::Conversion {
            input: task.input.clone(),
            output: task.output.clone(),
            status: "copy failed".to_string(),
            stdout: String::new(),
            stderr: e.to_string(),
        })?;
        Ok(())
    }
}

/// Write an executable `/bin/sh` script and return its path
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}
