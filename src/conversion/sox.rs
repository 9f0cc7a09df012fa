//! sox subprocess handling for audio conversion

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use super::{Transcoder, find_program};
use crate::core::FileTask;
use crate::error::{LoaderError, LoaderResult};

/// Sample rate the device plays back at
pub const SAMPLE_RATE: u32 = 30982;

/// Converts files by running sox with the device's fixed parameters
#[derive(Debug, Clone)]
pub struct SoxTranscoder {
    program: String,
}

impl SoxTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Build the sox argument list for one file
///
/// --buffer / --multi-threaded : I/O hints
/// --no-glob <input>           : Read the path literally
/// --clobber                   : Overwrite output without asking
/// -r -b -e                    : 30982 Hz, 16-bit signed PCM
/// remix -                     : Mix all channels down to mono
/// gain -n -1.5                : Normalize peaks to -1.5 dB
/// bass +1 loudness -1         : Tone adjustments for the small speaker
/// pad 0 0 dither              : Zero padding, then dither to 16 bits
pub fn sox_args(task: &FileTask) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(26);

    args.extend(["--buffer", "131072", "--multi-threaded", "--no-glob"].map(OsString::from));
    args.push(task.input.clone().into_os_string());

    args.push("--clobber".into());
    args.push(format!("-r{}", SAMPLE_RATE).into());
    args.extend(["-b", "16", "-e", "signed-integer", "--no-glob"].map(OsString::from));
    args.push(task.output.clone().into_os_string());

    args.extend(
        [
            "remix", "-", "gain", "-n", "-1.5", "bass", "+1", "loudness", "-1", "pad", "0", "0",
            "dither",
        ]
        .map(OsString::from),
    );

    args
}

impl Transcoder for SoxTranscoder {
    fn locate(&self) -> LoaderResult<PathBuf> {
        let search_path = std::env::var_os("PATH");
        find_program(&self.program, search_path.as_deref()).ok_or_else(|| {
            LoaderError::Configuration(format!("cannot find '{}' command", self.program))
        })
    }

    fn transcode(&self, task: &FileTask) -> LoaderResult<()> {
        log::debug!(
            "Running {} {:?}",
            self.program,
            sox_args(task)
        );

        let result = Command::new(&self.program).args(sox_args(task)).output();

        match result {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    if !stderr.trim().is_empty() {
                        log::debug!("{} stderr: {}", self.program, stderr.trim_end());
                    }
                    Ok(())
                } else {
                    Err(LoaderError::Conversion {
                        input: task.input.clone(),
                        output: task.output.clone(),
                        status: output.status.to_string(),
                        stdout,
                        stderr,
                    })
                }
            }
            Err(e) => Err(LoaderError::Conversion {
                input: task.input.clone(),
                output: task.output.clone(),
                status: format!("failed to run {}: {}", self.program, e),
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn task(input: &Path, output: &Path) -> FileTask {
        FileTask {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }
    }

    #[test]
    fn test_sox_args_fixed_parameters() {
        let args = sox_args(&task(Path::new("/in/a song.mp3"), Path::new("/out/0/0.WAV")));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();

        assert_eq!(
            args,
            vec![
                "--buffer", "131072", "--multi-threaded", "--no-glob", "/in/a song.mp3",
                "--clobber", "-r30982", "-b", "16", "-e", "signed-integer", "--no-glob",
                "/out/0/0.WAV", "remix", "-", "gain", "-n", "-1.5", "bass", "+1", "loudness",
                "-1", "pad", "0", "0", "dither",
            ]
        );
    }

    #[test]
    fn test_missing_program_is_conversion_error() {
        let transcoder = SoxTranscoder::new("/nonexistent/bin/sox");
        let err = transcoder
            .transcode(&task(Path::new("/in/a.mp3"), Path::new("/out/0/0.WAV")))
            .unwrap_err();

        match err {
            LoaderError::Conversion { input, status, .. } => {
                assert_eq!(input, Path::new("/in/a.mp3"));
                assert!(status.contains("failed to run"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_missing_program() {
        let transcoder = SoxTranscoder::new("/nonexistent/bin/sox");
        let err = transcoder.locate().unwrap_err();
        assert!(err.to_string().contains("cannot find '/nonexistent/bin/sox' command"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_output_is_captured() {
        let temp_dir = TempDir::new().unwrap();
        let tool = crate::test_fixtures::write_script(
            temp_dir.path(),
            "fake-sox",
            "echo converting\necho 'sox FAIL formats: bad header' >&2\nexit 2\n",
        );

        let transcoder = SoxTranscoder::new(tool.to_string_lossy());
        let err = transcoder
            .transcode(&task(Path::new("/in/b.mp3"), Path::new("/out/3/1.WAV")))
            .unwrap_err();

        match err {
            LoaderError::Conversion {
                input,
                output,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(input, Path::new("/in/b.mp3"));
                assert_eq!(output, Path::new("/out/3/1.WAV"));
                assert!(stdout.contains("converting"));
                assert!(stderr.contains("bad header"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_script_receives_input_and_output() {
        let temp_dir = TempDir::new().unwrap();
        // Arguments 5 and 13 are the input and output paths
        let tool = crate::test_fixtures::write_script(
            temp_dir.path(),
            "fake-sox",
            "cp \"$5\" \"${13}\"\n",
        );

        let input = temp_dir.path().join("a.mp3");
        let output = temp_dir.path().join("0.WAV");
        std::fs::write(&input, b"audio").unwrap();

        let transcoder = SoxTranscoder::new(tool.to_string_lossy());
        assert!(transcoder.locate().is_ok());
        transcoder.transcode(&task(&input, &output)).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"audio");
    }
}
