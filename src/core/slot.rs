//! The nine fixed button slots

use serde::Serialize;
use std::fmt;

/// Folder labels used when neither `N` nor `N <anything>` exists.
/// The colours match the button caps on the device.
const DEFAULT_LABELS: [&str; Slot::COUNT] = [
    "0 - brown",
    "1 - red",
    "2 - navy",
    "3 - lime",
    "4 - yellow",
    "5 - grey",
    "6 - blue",
    "7 - orange",
    "8 - green",
];

/// One of the nine playback buttons (0-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    pub const COUNT: usize = 9;

    #[allow(dead_code)]
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Slot(index))
        } else {
            None
        }
    }

    /// All slots in playback order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..Self::COUNT as u8).map(Slot)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Directory name used under the output and card roots
    pub fn dir_name(self) -> String {
        self.0.to_string()
    }

    /// Prefix that a labelled input folder starts with, e.g. `"3 "`
    pub fn label_prefix(self) -> String {
        format!("{} ", self.0)
    }

    pub fn default_label(self) -> &'static str {
        DEFAULT_LABELS[self.index()]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_nine_slots() {
        let slots: Vec<Slot> = Slot::all().collect();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots.first().unwrap().index(), 0);
        assert_eq!(slots.last().unwrap().index(), 8);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Slot::new(8).is_some());
        assert!(Slot::new(9).is_none());
    }

    #[test]
    fn test_default_labels_start_with_prefix() {
        for slot in Slot::all() {
            assert!(
                slot.default_label().starts_with(&slot.label_prefix()),
                "default label for {} should start with its prefix",
                slot
            );
        }
        assert_eq!(Slot::new(0).unwrap().default_label(), "0 - brown");
        assert_eq!(Slot::new(8).unwrap().default_label(), "8 - green");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Slot::new(5).unwrap()).unwrap();
        assert_eq!(json, "5");
    }
}
