//! Hoerbert Loader
//!
//! Converts the nine button folders under `<base>/input` into the WAV format
//! the player expects, writes them to `<base>/output`, and optionally copies
//! the result onto the player's SD card.

mod card;
mod conversion;
mod core;
mod error;
mod loader;
mod logging;
mod preflight;
mod test_fixtures;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use conversion::SoxTranscoder;
use crate::core::{LoaderConfig, LoaderSettings, PathResolver};
use error::LoaderResult;
use loader::Loader;

/// Convert audio folders for the nine buttons and load them onto a card
#[derive(Debug, Parser)]
#[command(name = "hoerbert-loader", version, about)]
struct Cli {
    /// Mounted card to load after converting (e.g. /media/me/HOERBERT)
    card: Option<PathBuf>,

    /// Directory containing input/ and output/ [default: current directory]
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// Transcoder program to run instead of the one in loader.json
    #[arg(long, value_name = "PROGRAM")]
    transcoder: Option<String>,

    /// Create the input folders for every button and exit
    #[arg(long)]
    init: bool,

    /// Print the run report as JSON when done
    #[arg(long)]
    json: bool,

    /// Show debug output on the terminal
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let base_path = match cli.base.clone() {
        Some(path) => path,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Cannot determine current directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    // Settings decide whether we log to a file, so read them before logging is up
    let settings = match LoaderSettings::load(&base_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(cli.verbose, settings.log_to_file);

    let config = LoaderConfig::new(&base_path, cli.card.clone());

    match execute(&cli, config, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli, config: LoaderConfig, settings: LoaderSettings) -> LoaderResult<()> {
    if cli.init {
        let folders = crate::core::setup_input(&PathResolver::new(&config))?;
        for folder in folders {
            log::info!("  {}", folder.display());
        }
        log::info!("Input folders ready");
        return Ok(());
    }

    let program = cli.transcoder.clone().unwrap_or(settings.transcoder);
    let transcoder = SoxTranscoder::new(program);
    log::debug!("Transcoder: {}", transcoder.program());

    let report = Loader::new(config, transcoder).run()?;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Could not serialize run report: {}", e),
        }
    }

    log::info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["hoerbert-loader"]).unwrap();
        assert!(cli.card.is_none());
        assert!(cli.base.is_none());
        assert!(!cli.init);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_card_and_options() {
        let cli = Cli::try_parse_from([
            "hoerbert-loader",
            "--base",
            "/home/kid/hoerbert",
            "--transcoder",
            "/usr/local/bin/sox",
            "-v",
            "/media/kid/HOERBERT",
        ])
        .unwrap();

        assert_eq!(cli.card, Some(PathBuf::from("/media/kid/HOERBERT")));
        assert_eq!(cli.base, Some(PathBuf::from("/home/kid/hoerbert")));
        assert_eq!(cli.transcoder.as_deref(), Some("/usr/local/bin/sox"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_extra_positionals() {
        assert!(Cli::try_parse_from(["hoerbert-loader", "/media/a", "/media/b"]).is_err());
    }

    #[test]
    fn test_init_scaffolds_inputs() {
        let fixture = test_fixtures::LoaderFixture::new();
        let cli = Cli::try_parse_from(["hoerbert-loader", "--init"]).unwrap();

        execute(&cli, fixture.config(), LoaderSettings::default()).unwrap();

        assert!(fixture.input_root().join("0 - brown").is_dir());
        assert!(!fixture.base().join("output").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_with_script_transcoder() {
        let fixture = test_fixtures::LoaderFixture::with_all_slots();
        fixture.add_input("1", &["a.mp3"]);
        let bin = tempfile::TempDir::new().unwrap();
        let tool = test_fixtures::write_script(bin.path(), "sox", "cp \"$5\" \"${13}\"\n");

        let cli = Cli::try_parse_from([
            "hoerbert-loader".to_string(),
            "--transcoder".to_string(),
            tool.to_string_lossy().to_string(),
        ])
        .unwrap();
        execute(&cli, fixture.config(), LoaderSettings::default()).unwrap();

        assert_eq!(
            std::fs::read(fixture.output_dir(1).join("0.WAV")).unwrap(),
            b"a.mp3"
        );
    }
}
