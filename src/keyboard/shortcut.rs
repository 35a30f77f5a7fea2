//! Keyboard shortcut parser.
//!
//! Parses portable shortcut text like "Ctrl+Shift+T" or the two-chord
//! "Ctrl+K, Ctrl+C" into [`Shortcut`] values and formats them back. Up to four
//! chords are allowed per shortcut.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest chord sequence a single shortcut may hold
pub const MAX_CHORDS: usize = 4;

/// Set of active modifiers for a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Meta / Super / Cmd key
    pub meta: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }
}

/// Non-character keys with a portable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedKey {
    F(u8),
    Esc,
    Tab,
    Backtab,
    Backspace,
    Return,
    Enter,
    Ins,
    Del,
    Pause,
    Print,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    PgUp,
    PgDown,
    Space,
}

impl NamedKey {
    fn parse(s: &str) -> Option<NamedKey> {
        let lower = s.to_ascii_lowercase();
        let key = match lower.as_str() {
            "esc" | "escape" => NamedKey::Esc,
            "tab" => NamedKey::Tab,
            "backtab" => NamedKey::Backtab,
            "backspace" => NamedKey::Backspace,
            "return" => NamedKey::Return,
            "enter" => NamedKey::Enter,
            "ins" | "insert" => NamedKey::Ins,
            "del" | "delete" => NamedKey::Del,
            "pause" => NamedKey::Pause,
            "print" => NamedKey::Print,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "left" => NamedKey::Left,
            "up" => NamedKey::Up,
            "right" => NamedKey::Right,
            "down" => NamedKey::Down,
            "pgup" | "pageup" => NamedKey::PgUp,
            "pgdown" | "pagedown" => NamedKey::PgDown,
            "space" => NamedKey::Space,
            _ => {
                let number = lower.strip_prefix('f')?.parse::<u8>().ok()?;
                return (1..=35).contains(&number).then_some(NamedKey::F(number));
            }
        };
        Some(key)
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedKey::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The non-modifier part of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A single printable character, stored upper-cased
    Character(char),
    Named(NamedKey),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Character(c) => write!(f, "{}", c),
            Key::Named(n) => write!(f, "{}", n),
        }
    }
}

/// One key press with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (active, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.meta, "Meta"),
        ] {
            if active {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// A shortcut: one to [`MAX_CHORDS`] chords pressed in sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    chords: Vec<KeyChord>,
}

impl Shortcut {
    pub fn chords(&self) -> &[KeyChord] {
        &self.chords
    }

    pub fn single(chord: KeyChord) -> Self {
        Shortcut {
            chords: vec![chord],
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", chord)?;
        }
        Ok(())
    }
}

impl FromStr for Shortcut {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_shortcut(s)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        parse_shortcut(&value)
    }
}

impl From<Shortcut> for String {
    fn from(value: Shortcut) -> Self {
        value.to_string()
    }
}

fn invalid(text: &str, message: impl Into<String>) -> Error {
    Error::InvalidShortcut {
        text: text.to_string(),
        message: message.into(),
    }
}

/// Parse a shortcut string into a [`Shortcut`].
///
/// Chords are separated by `", "` and each chord has the form
/// `Modifier+Modifier+Key`.
///
/// Modifiers (case-insensitive):
/// - `Ctrl`, `Control`
/// - `Alt`, `Option`
/// - `Shift`
/// - `Meta`, `Super`, `Cmd`, `Win`
///
/// Keys: single characters (`T`, `1`, `+`) or portable names (`F5`, `Esc`,
/// `PgDown`, `Space`, ...).
pub fn parse_shortcut(s: &str) -> Result<Shortcut> {
    let text = s.trim();
    if text.is_empty() {
        return Err(invalid(s, "empty shortcut"));
    }

    let chords = text
        .split(", ")
        .map(|part| parse_chord(part.trim()).map_err(|message| invalid(s, message)))
        .collect::<Result<Vec<_>>>()?;

    if chords.len() > MAX_CHORDS {
        return Err(invalid(
            s,
            format!("at most {} chords are allowed, got {}", MAX_CHORDS, chords.len()),
        ));
    }
    Ok(Shortcut { chords })
}

fn parse_chord(text: &str) -> std::result::Result<KeyChord, String> {
    if text.is_empty() {
        return Err("empty chord".to_string());
    }

    // "+" on its own, or a trailing "++", means the plus key itself
    let (modifier_text, key_text) = if text == "+" {
        ("", "+")
    } else if let Some(prefix) = text.strip_suffix("++") {
        (prefix, "+")
    } else {
        match text.rsplit_once('+') {
            Some((prefix, key)) => (prefix, key),
            None => ("", text),
        }
    };

    let mut modifiers = Modifiers::default();
    if !modifier_text.is_empty() {
        for part in modifier_text.split('+') {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "super" | "cmd" | "win" => modifiers.meta = true,
                "" => return Err("empty modifier".to_string()),
                other => return Err(format!("unknown modifier '{}'", other)),
            }
        }
    }

    let key_text = key_text.trim();
    if key_text.is_empty() {
        return Err("chord ends with a modifier, no key specified".to_string());
    }
    if is_modifier_name(key_text) {
        return Err(format!("'{}' is a modifier, not a key", key_text));
    }

    let key = if let Some(named) = NamedKey::parse(key_text) {
        Key::Named(named)
    } else {
        let mut chars = key_text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Character(c.to_uppercase().next().unwrap_or(c)),
            _ => return Err(format!("unknown key '{}'", key_text)),
        }
    };

    Ok(KeyChord { modifiers, key })
}

fn is_modifier_name(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "ctrl" | "control" | "alt" | "option" | "shift" | "meta" | "super" | "cmd" | "win"
    )
}
