//! Format mode value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidFormatModeError;

/// All available format modes
pub const ALL_MODES: &[FormatMode] = &[FormatMode::General, FormatMode::Email, FormatMode::Bullets];

/// Format mode selecting the prompt template that wraps a transcript
/// before it is sent for remote cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatMode {
    #[default]
    General,
    Email,
    Bullets,
}

impl FormatMode {
    /// Get the human-readable label for this mode
    pub const fn label(&self) -> &'static str {
        match self {
            Self::General => "General cleanup",
            Self::Email => "Formal email",
            Self::Bullets => "Bullet points",
        }
    }

    /// Get the string identifier for this mode
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Email => "email",
            Self::Bullets => "bullets",
        }
    }
}

impl FromStr for FormatMode {
    type Err = InvalidFormatModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "email" => Ok(Self::Email),
            "bullets" => Ok(Self::Bullets),
            _ => Err(InvalidFormatModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_modes() {
        assert_eq!("general".parse::<FormatMode>().unwrap(), FormatMode::General);
        assert_eq!("email".parse::<FormatMode>().unwrap(), FormatMode::Email);
        assert_eq!("bullets".parse::<FormatMode>().unwrap(), FormatMode::Bullets);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("EMAIL".parse::<FormatMode>().unwrap(), FormatMode::Email);
        assert_eq!("  Bullets ".parse::<FormatMode>().unwrap(), FormatMode::Bullets);
    }

    #[test]
    fn parse_invalid() {
        assert!("haiku".parse::<FormatMode>().is_err());
        assert!("".parse::<FormatMode>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for mode in ALL_MODES {
            assert_eq!(mode.to_string().parse::<FormatMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn default_is_general() {
        assert_eq!(FormatMode::default(), FormatMode::General);
    }

    #[test]
    fn labels_not_empty() {
        for mode in ALL_MODES {
            assert!(!mode.label().is_empty());
        }
    }
}
