//! Hotkey chord parsing

mod chord;

pub use chord::{ChordKey, HotkeyChord};
