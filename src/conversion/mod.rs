//! Audio conversion module
//!
//! Handles transcoding source files to the device's WAV format using sox,
//! and the lifecycle of the output tree the files are written into.

mod output_manager;
mod sox;

pub use output_manager::OutputTree;
pub use sox::SoxTranscoder;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::FileTask;
use crate::error::LoaderResult;

/// Something that can turn one source file into a device track
pub trait Transcoder {
    /// Confirm the tool can be run, returning where it was found
    fn locate(&self) -> LoaderResult<PathBuf>;

    /// Convert `task.input` into `task.output`, blocking until done
    fn transcode(&self, task: &FileTask) -> LoaderResult<()>;
}

/// Find `program` the way a shell would.
///
/// Names containing a path separator are checked directly, bare names are
/// searched for in each entry of `search_path`.
pub fn find_program(program: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

/// Check that a path is a file we are allowed to execute
fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_program_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path_var = temp_dir.path().as_os_str();
        assert!(find_program("definitely-not-sox", Some(path_var)).is_none());
    }

    #[test]
    fn test_find_program_without_search_path() {
        assert!(find_program("sox", None).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let empty = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let tool = bin.path().join("sox");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let search = std::env::join_paths([empty.path(), bin.path()]).unwrap();
        assert_eq!(find_program("sox", Some(&search)), Some(tool.clone()));

        // Explicit paths skip the search entirely
        let explicit = tool.to_string_lossy().to_string();
        assert_eq!(find_program(&explicit, None), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_ignored() {
        use std::os::unix::fs::PermissionsExt;

        let bin = TempDir::new().unwrap();
        let tool = bin.path().join("sox");
        std::fs::write(&tool, "not a program").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(find_program("sox", Some(bin.path().as_os_str())).is_none());
    }
}
