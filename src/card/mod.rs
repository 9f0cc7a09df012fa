//! Card module
//!
//! Copies the finished output tree onto the player's SD card.

mod sync;

pub use sync::CardSync;
