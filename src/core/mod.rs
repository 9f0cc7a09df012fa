//! Core loader logic
//!
//! This module contains:
//! - The nine button slots and their default folder labels
//! - Resolving slots to input, output and card folders
//! - Ordering a button's files into numbered conversion tasks
//! - Run configuration and persisted settings
//! - Scaffolding of the input folders

mod button;
mod paths;
mod scaffold;
mod settings;
mod slot;

pub use button::{Button, FileTask};
pub use paths::PathResolver;
pub use scaffold::setup_input;
pub use settings::{LoaderConfig, LoaderSettings};
pub use slot::Slot;
