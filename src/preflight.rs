//! Checks run before and right after the output tree is rebuilt
//!
//! Each check stops at the first problem it finds.

use std::path::PathBuf;

use crate::card::CardSync;
use crate::conversion::{OutputTree, Transcoder};
use crate::core::{Button, Slot};
use crate::error::{LoaderError, LoaderResult};

/// Validate everything the conversion needs before any output is deleted.
///
/// Order: input root, each resolved input folder, the transcoder, the card.
pub fn check_inputs(
    input_root: &std::path::Path,
    buttons: &[Button],
    transcoder: &dyn Transcoder,
    card: Option<&CardSync>,
) -> LoaderResult<PathBuf> {
    if !input_root.is_dir() {
        return Err(LoaderError::missing("input root", input_root));
    }

    for button in buttons {
        if !button.input_dir.is_dir() {
            return Err(LoaderError::NotADirectory {
                slot: button.slot,
                path: button.input_dir.clone(),
            });
        }
    }

    let tool = transcoder.locate()?;
    log::debug!("Using transcoder at {}", tool.display());

    if let Some(card) = card {
        card.check_writable()?;
    }

    Ok(tool)
}

/// Validate the freshly rebuilt output tree
pub fn check_output(output: &OutputTree) -> LoaderResult<()> {
    if !output.root().is_dir() {
        return Err(LoaderError::missing("output root", output.root()));
    }

    for slot in Slot::all() {
        let dir = output.slot_dir(slot);
        if !dir.is_dir() {
            return Err(LoaderError::missing("output folder", &dir));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoaderConfig, PathResolver};
    use crate::test_fixtures::{CopyTranscoder, LoaderFixture};
    use std::fs;

    fn resolved(fixture: &LoaderFixture) -> (PathResolver, Vec<Button>) {
        let resolver = PathResolver::new(&fixture.config());
        let buttons = resolver.buttons().unwrap();
        (resolver, buttons)
    }

    #[test]
    fn test_inputs_ok() {
        let fixture = LoaderFixture::with_all_slots();
        let (resolver, buttons) = resolved(&fixture);

        let tool = check_inputs(resolver.input_root(), &buttons, &CopyTranscoder::new(), None);
        assert!(tool.is_ok());
    }

    #[test]
    fn test_missing_input_root() {
        let fixture = LoaderFixture::new();
        let config = LoaderConfig::new(fixture.base(), None);

        let err = check_inputs(&config.input_root(), &[], &CopyTranscoder::new(), None).unwrap_err();
        assert!(err.to_string().contains("input root does not exist"));
    }

    #[test]
    fn test_input_that_is_a_file() {
        let fixture = LoaderFixture::with_all_slots();
        let input = fixture.base().join("input");
        fs::remove_dir_all(input.join("4")).unwrap();
        fs::write(input.join("4"), b"oops").unwrap();
        let (resolver, buttons) = resolved(&fixture);

        let err = check_inputs(resolver.input_root(), &buttons, &CopyTranscoder::new(), None)
            .unwrap_err();
        assert!(
            matches!(err, LoaderError::NotADirectory { slot, .. } if slot.index() == 4),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_missing_transcoder() {
        let fixture = LoaderFixture::with_all_slots();
        let (resolver, buttons) = resolved(&fixture);

        let transcoder = CopyTranscoder::unavailable();
        let err = check_inputs(resolver.input_root(), &buttons, &transcoder, None).unwrap_err();
        assert!(matches!(err, LoaderError::Configuration(_)));
    }

    #[test]
    fn test_card_checked_when_requested() {
        let fixture = LoaderFixture::with_all_slots();
        let (resolver, buttons) = resolved(&fixture);
        let card = CardSync::new(fixture.base().join("no-card-here"));

        let err = check_inputs(resolver.input_root(), &buttons, &CopyTranscoder::new(), Some(&card))
            .unwrap_err();
        assert!(err.to_string().contains("cannot write to card path"));
    }

    #[test]
    fn test_output_checked_after_rebuild() {
        let fixture = LoaderFixture::new();
        let output = OutputTree::new(fixture.base().join("output"));

        assert!(check_output(&output).is_err());

        output.recreate().unwrap();
        assert!(check_output(&output).is_ok());

        fs::remove_dir(output.slot_dir(Slot::new(8).unwrap())).unwrap();
        let err = check_output(&output).unwrap_err();
        assert!(err.to_string().contains("output folder does not exist"));
    }
}
