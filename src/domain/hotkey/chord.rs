//! Hotkey chord value object
//!
//! Parses combination strings of the form `ctrl+alt+d`: zero or more
//! modifiers followed by exactly one terminal key. Matching against a set
//! of currently held keys is left to the listener adapter; the domain type
//! only knows names.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidChordError;

/// The non-modifier key that completes a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKey {
    /// Letter key `a`..`z`
    Letter(char),
    /// Digit key `0`..`9` on the top row
    Digit(char),
    /// Function key F1..F12
    Function(u8),
    Space,
    Escape,
}

impl ChordKey {
    fn parse(token: &str) -> Option<Self> {
        let token = token.to_lowercase();
        match token.as_str() {
            "space" => return Some(Self::Space),
            "esc" | "escape" => return Some(Self::Escape),
            _ => {}
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => return Some(Self::Letter(c)),
            (Some(c), None) if c.is_ascii_digit() => return Some(Self::Digit(c)),
            _ => {}
        }
        if let Some(num) = token.strip_prefix('f') {
            if let Ok(n @ 1..=12) = num.parse::<u8>() {
                return Some(Self::Function(n));
            }
        }
        None
    }
}

impl fmt::Display for ChordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) | Self::Digit(c) => write!(f, "{}", c),
            Self::Function(n) => write!(f, "f{}", n),
            Self::Space => write!(f, "space"),
            Self::Escape => write!(f, "esc"),
        }
    }
}

/// A global hotkey combination: modifier set plus one terminal key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: ChordKey,
}

impl HotkeyChord {
    /// Number of keys that must be held simultaneously
    pub fn key_count(&self) -> usize {
        1 + [self.ctrl, self.alt, self.shift, self.meta]
            .iter()
            .filter(|held| **held)
            .count()
    }
}

impl Default for HotkeyChord {
    /// The default chord, `ctrl+alt+d`
    fn default() -> Self {
        Self {
            ctrl: true,
            alt: true,
            shift: false,
            meta: false,
            key: ChordKey::Letter('d'),
        }
    }
}

impl FromStr for HotkeyChord {
    type Err = InvalidChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidChordError {
            input: s.to_string(),
        };

        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;
        let mut meta = false;
        let mut key = None;

        for token in s.split('+') {
            let token = token.trim().to_lowercase();
            match token.as_str() {
                "" => return Err(invalid()),
                "ctrl" | "control" => ctrl = true,
                "alt" => alt = true,
                "shift" => shift = true,
                "meta" | "super" | "cmd" | "win" => meta = true,
                _ => {
                    if key.is_some() {
                        // Two terminal keys in one chord
                        return Err(invalid());
                    }
                    key = Some(ChordKey::parse(&token).ok_or_else(invalid)?);
                }
            }
        }

        Ok(Self {
            ctrl,
            alt,
            shift,
            meta,
            key: key.ok_or_else(invalid)?,
        })
    }
}

impl fmt::Display for HotkeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.alt {
            write!(f, "alt+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        if self.meta {
            write!(f, "meta+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_chord() {
        let chord: HotkeyChord = "ctrl+alt+d".parse().unwrap();
        assert!(chord.ctrl);
        assert!(chord.alt);
        assert!(!chord.shift);
        assert_eq!(chord.key, ChordKey::Letter('d'));
        assert_eq!(chord.key_count(), 3);
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        let chord: HotkeyChord = " Ctrl + Shift + R ".parse().unwrap();
        assert!(chord.ctrl);
        assert!(chord.shift);
        assert_eq!(chord.key, ChordKey::Letter('r'));
    }

    #[test]
    fn parse_function_and_digit_keys() {
        let f9: HotkeyChord = "f9".parse().unwrap();
        assert_eq!(f9.key, ChordKey::Function(9));
        assert_eq!(f9.key_count(), 1);

        let digit: HotkeyChord = "meta+3".parse().unwrap();
        assert!(digit.meta);
        assert_eq!(digit.key, ChordKey::Digit('3'));
    }

    #[test]
    fn parse_modifier_aliases() {
        let chord: HotkeyChord = "super+space".parse().unwrap();
        assert!(chord.meta);
        assert_eq!(chord.key, ChordKey::Space);
    }

    #[test]
    fn reject_missing_terminal_key() {
        assert!("ctrl+alt".parse::<HotkeyChord>().is_err());
        assert!("".parse::<HotkeyChord>().is_err());
    }

    #[test]
    fn reject_two_terminal_keys() {
        assert!("a+b".parse::<HotkeyChord>().is_err());
    }

    #[test]
    fn reject_unknown_key() {
        assert!("ctrl+f13".parse::<HotkeyChord>().is_err());
        assert!("ctrl+enterkey".parse::<HotkeyChord>().is_err());
    }

    #[test]
    fn default_matches_default_setting() {
        assert_eq!(HotkeyChord::default(), "ctrl+alt+d".parse().unwrap());
    }

    #[test]
    fn display_round_trips() {
        for combo in ["ctrl+alt+d", "ctrl+shift+f5", "meta+space", "q"] {
            let chord: HotkeyChord = combo.parse().unwrap();
            assert_eq!(chord.to_string(), combo);
            assert_eq!(chord.to_string().parse::<HotkeyChord>().unwrap(), chord);
        }
    }
}
