//! Keyboard shortcut overlay.
//!
//! Chords map straight to actions and never pass through the grammar.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, VoiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    ToggleVoice,
    StartListening,
    StopOutput,
    Help,
    ToggleSettings,
}

impl ShortcutAction {
    pub fn description(&self) -> &'static str {
        match self {
            Self::ToggleVoice => "toggle voice control",
            Self::StartListening => "start listening",
            Self::StopOutput => "stop speech output",
            Self::Help => "voice command help",
            Self::ToggleSettings => "toggle voice settings",
        }
    }
}

/// A modifier chord such as `Ctrl+Shift+V`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: char,
}

impl KeyChord {
    pub const fn ctrl_shift(key: char) -> Self {
        Self {
            ctrl: true,
            shift: true,
            alt: false,
            key,
        }
    }
}

impl FromStr for KeyChord {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || VoiceError::InvalidChord(s.to_string());
        let mut chord = KeyChord {
            ctrl: false,
            shift: false,
            alt: false,
            key: '\0',
        };

        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = match parts.split_last() {
            // a trailing "+" makes the key itself "+"
            Some((&"", rest)) if !rest.is_empty() && s.ends_with("++") => {
                ("+", &rest[..rest.len() - 1])
            }
            Some((key, rest)) => (*key, rest),
            None => return Err(invalid()),
        };

        for modifier in modifiers {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                _ => return Err(invalid()),
            }
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => chord.key = c.to_ascii_uppercase(),
            _ => return Err(invalid()),
        }

        if !(chord.ctrl || chord.alt) {
            return Err(invalid());
        }
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Fixed chord table.
#[derive(Debug, Clone)]
pub struct ShortcutMap {
    bindings: Vec<(KeyChord, ShortcutAction)>,
}

impl ShortcutMap {
    pub fn standard() -> Self {
        Self {
            bindings: vec![
                (KeyChord::ctrl_shift('V'), ShortcutAction::ToggleVoice),
                (KeyChord::ctrl_shift('L'), ShortcutAction::StartListening),
                (KeyChord::ctrl_shift('S'), ShortcutAction::StopOutput),
                (KeyChord::ctrl_shift('H'), ShortcutAction::Help),
                (KeyChord::ctrl_shift(','), ShortcutAction::ToggleSettings),
            ],
        }
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == chord)
            .map(|(_, action)| *action)
    }

    pub fn bindings(&self) -> &[(KeyChord, ShortcutAction)] {
        &self.bindings
    }
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chords() {
        assert_eq!("Ctrl+Shift+V".parse::<KeyChord>().unwrap(), KeyChord::ctrl_shift('V'));
        assert_eq!("ctrl + shift + l".parse::<KeyChord>().unwrap(), KeyChord::ctrl_shift('L'));
        assert_eq!("Ctrl+Shift+,".parse::<KeyChord>().unwrap(), KeyChord::ctrl_shift(','));
    }

    #[test]
    fn test_invalid_chords() {
        for bad in ["", "V", "Shift+V", "Ctrl+Meta+V", "Ctrl+Shift+Enter"] {
            assert!(
                matches!(bad.parse::<KeyChord>(), Err(VoiceError::InvalidChord(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_standard_bindings() {
        let map = ShortcutMap::standard();
        let lookup = |s: &str| map.lookup(&s.parse().unwrap());
        assert_eq!(lookup("Ctrl+Shift+V"), Some(ShortcutAction::ToggleVoice));
        assert_eq!(lookup("Ctrl+Shift+L"), Some(ShortcutAction::StartListening));
        assert_eq!(lookup("Ctrl+Shift+S"), Some(ShortcutAction::StopOutput));
        assert_eq!(lookup("Ctrl+Shift+H"), Some(ShortcutAction::Help));
        assert_eq!(lookup("Ctrl+Shift+,"), Some(ShortcutAction::ToggleSettings));
        assert_eq!(lookup("Ctrl+Alt+V"), None);
    }

    #[test]
    fn test_display_round_trip() {
        let chord = KeyChord::ctrl_shift('H');
        assert_eq!(chord.to_string(), "Ctrl+Shift+H");
        assert_eq!(chord.to_string().parse::<KeyChord>().unwrap(), chord);
    }
}
