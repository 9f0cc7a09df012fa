//! Load workflow execution
//!
//! Runs one complete load, blocking until done:
//! 1. Resolve all nine buttons from a single look at the input root
//! 2. Preflight the inputs, the transcoder and the card
//! 3. Rebuild the output tree from empty and check it
//! 4. Convert every button's files in order, slot 0 through 8
//! 5. Mirror the output onto the card, if one was given
//!
//! The first error stops the run. Files converted before the failure stay in
//! the output tree and the card is left untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;

use crate::card::CardSync;
use crate::conversion::{OutputTree, Transcoder};
use crate::core::{Button, LoaderConfig, PathResolver, Slot};
use crate::error::LoaderResult;
use crate::preflight;

/// What happened to one button during a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ButtonReport {
    pub slot: Slot,
    pub input: PathBuf,
    pub output: PathBuf,
    pub card: Option<PathBuf>,
    pub files: usize,
    pub shuffled: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub buttons: Vec<ButtonReport>,
    /// Card root that was loaded, if any
    pub card: Option<PathBuf>,
}

impl RunReport {
    pub fn total_files(&self) -> usize {
        self.buttons.iter().map(|b| b.files).sum()
    }
}

pub struct Loader<T: Transcoder> {
    config: LoaderConfig,
    transcoder: T,
}

impl<T: Transcoder> Loader<T> {
    pub fn new(config: LoaderConfig, transcoder: T) -> Self {
        Self { config, transcoder }
    }

    /// Run with the thread-local random generator for shuffled buttons
    pub fn run(&self) -> LoaderResult<RunReport> {
        self.run_with_rng(&mut rand::thread_rng())
    }

    /// Run with an explicit random source for shuffled buttons
    pub fn run_with_rng<R>(&self, rng: &mut R) -> LoaderResult<RunReport>
    where
        R: Rng + ?Sized,
    {
        let started_at = Utc::now();
        let resolver = PathResolver::new(&self.config);
        let output = OutputTree::new(resolver.output_root());
        let card = resolver.card_root().map(CardSync::new);

        log::info!("Starting from {}", self.config.base_path.display());

        let buttons = resolver.buttons()?;
        preflight::check_inputs(
            resolver.input_root(),
            &buttons,
            &self.transcoder,
            card.as_ref(),
        )?;

        output.recreate()?;
        preflight::check_output(&output)?;

        log::info!("Converting...");
        let mut reports = Vec::with_capacity(buttons.len());
        for button in &buttons {
            reports.push(self.convert_button(button, rng)?);
        }

        if let Some(card) = &card {
            log::info!("Loading card at {}", card.card_root().display());
            card.load(output.root())?;
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            buttons: reports,
            card: card.map(|c| c.card_root().to_path_buf()),
        };
        log::info!(
            "Done: {} files across {} buttons",
            report.total_files(),
            report.buttons.len()
        );
        Ok(report)
    }

    fn convert_button<R>(&self, button: &Button, rng: &mut R) -> LoaderResult<ButtonReport>
    where
        R: Rng + ?Sized,
    {
        let shuffled = button.is_shuffle();
        log::info!(
            "Processing button {} from {}{}",
            button.slot,
            button.input_dir.display(),
            if shuffled { " (shuffled)" } else { "" }
        );

        let tasks = button.files(rng)?;
        for task in &tasks {
            log::info!(
                "Converting {} -> {}",
                task.input.display(),
                task.output.display()
            );
            self.transcoder.transcode(task)?;
        }

        Ok(ButtonReport {
            slot: button.slot,
            input: button.input_dir.clone(),
            output: button.output_dir.clone(),
            card: button.card_dir.clone(),
            files: tasks.len(),
            shuffled,
        })
    }
}
