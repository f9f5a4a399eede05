//! Hotkey strings such as `"ctrl+shift+b"`.
//!
//! Parsing is case-insensitive and `+`-separated. A hotkey has any number of
//! modifiers and exactly one key: a letter, a digit or `f1`..`f12`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, the Windows/Super key elsewhere.
    pub command: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Lowercase ASCII letter or digit.
    Char(char),
    /// Function key, 1..=12.
    Function(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("hotkey has no key, only modifiers")]
    MissingKey,

    #[error("hotkey has more than one key: '{first}' and '{second}'")]
    MultipleKeys { first: String, second: String },

    #[error("modifier '{0}' is repeated")]
    RepeatedModifier(String),
}

impl FromStr for Hotkey {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(HotkeyError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key: Option<(Key, String)> = None;

        for token in normalized.split('+').map(str::trim) {
            let flag = match token {
                "ctrl" | "control" => Some(&mut modifiers.ctrl),
                "shift" => Some(&mut modifiers.shift),
                "alt" | "option" => Some(&mut modifiers.alt),
                "cmd" | "command" | "super" | "win" | "meta" => Some(&mut modifiers.command),
                _ => None,
            };

            if let Some(flag) = flag {
                if *flag {
                    return Err(HotkeyError::RepeatedModifier(token.to_string()));
                }
                *flag = true;
                continue;
            }

            let parsed = parse_key(token)?;
            if let Some((_, first)) = &key {
                return Err(HotkeyError::MultipleKeys {
                    first: first.clone(),
                    second: token.to_string(),
                });
            }
            key = Some((parsed, token.to_string()));
        }

        match key {
            Some((key, _)) => Ok(Hotkey { modifiers, key }),
            None => Err(HotkeyError::MissingKey),
        }
    }
}

fn parse_key(token: &str) -> Result<Key, HotkeyError> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(Key::Char(c));
        }
    }

    if let Some(n) = token.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(Key::Function(n));
        }
    }

    Err(HotkeyError::UnknownKey(token.to_string()))
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (on, name) in [
            (m.ctrl, "ctrl"),
            (m.alt, "alt"),
            (m.shift, "shift"),
            (m.command, "cmd"),
        ] {
            if on {
                write!(f, "{name}+")?;
            }
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "f{n}"),
        }
    }
}
