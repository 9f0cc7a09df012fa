//! Error types for the loader pipeline
//!
//! Every stage returns a `LoaderResult`. The first error ends the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::Slot;

#[derive(Debug, Error)]
pub enum LoaderError {
    /// Missing roots, missing tool, unusable card, bad settings file
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No folder under the input root matched the slot
    #[error("no input folder for button {slot}: tried \"{slot}\", \"{slot} *\" and \"{default_label}\"")]
    Resolution {
        slot: Slot,
        default_label: &'static str,
    },

    /// The resolved input exists but cannot be used as a folder
    #[error("input for button {slot} is not a directory: {}", .path.display())]
    NotADirectory { slot: Slot, path: PathBuf },

    /// The transcoder failed on a single file
    #[error(
        "failed to convert {} -> {}: {status}{}",
        .input.display(),
        .output.display(),
        format_tool_output(.stdout, .stderr)
    )]
    Conversion {
        input: PathBuf,
        output: PathBuf,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// Copying a button folder onto the card failed
    #[error("failed to load button {slot} onto card at {}: {source}", .path.display())]
    Sync {
        slot: Slot,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output tree could not be rebuilt
    #[error("output tree error at {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type LoaderResult<T> = Result<T, LoaderError>;

impl LoaderError {
    /// Shorthand for the common "path is missing" configuration failure
    pub fn missing(what: &str, path: &std::path::Path) -> Self {
        LoaderError::Configuration(format!("{} does not exist: {}", what, path.display()))
    }
}

fn format_tool_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str("\n--- stdout ---\n");
        out.push_str(stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        out.push_str("\n--- stderr ---\n");
        out.push_str(stderr.trim_end());
    }
    out
}
