//! Pointer and keyboard events as delivered by the host toolkit.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A decimal digit, `0..=9`.
    Digit(u8),
    Backspace,
    Enter,
    Escape,
    /// Snap toggle.
    F3,
    /// Ortho toggle.
    F8,
    /// Anything else, by host name.
    Other(String),
}

impl Key {
    /// Decode a host key name (`"5"`, `"Digit5"`, `"Numpad5"`, `"Enter"`, `"F8"`, ...).
    pub fn from_name(name: &str) -> Self {
        let digit = name
            .strip_prefix("Digit")
            .or_else(|| name.strip_prefix("Numpad"))
            .unwrap_or(name);
        if let [byte @ b'0'..=b'9'] = digit.as_bytes() {
            return Key::Digit(byte - b'0');
        }
        match name {
            "Backspace" => Key::Backspace,
            "Enter" | "Return" | "NumpadEnter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "F3" => Key::F3,
            "F8" => Key::F8,
            other => Key::Other(other.to_string()),
        }
    }

    /// The character a digit key types.
    pub fn digit_char(&self) -> Option<char> {
        match self {
            Key::Digit(d) => char::from_digit(u32::from(*d), 10),
            _ => None,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("7"), Key::Digit(7));
        assert_eq!(Key::from_name("Digit0"), Key::Digit(0));
        assert_eq!(Key::from_name("Numpad3"), Key::Digit(3));
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("F3"), Key::F3);
        assert_eq!(Key::from_name("F8"), Key::F8);
        assert_eq!(Key::from_name("F12"), Key::Other("F12".into()));
        assert_eq!(Key::from_name("42"), Key::Other("42".into()));
    }

    #[test]
    fn test_digit_char() {
        assert_eq!(Key::Digit(4).digit_char(), Some('4'));
        assert_eq!(Key::Enter.digit_char(), None);
    }
}
