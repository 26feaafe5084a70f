//! Platform-independent key and target representation
//!
//! Hosts translate their native keyboard events into [`KeyEvent`], attaching
//! the metadata the state machine needs about the element that received the
//! key: whether its text is empty and where it sits on screen.

use serde::{Deserialize, Serialize};

/// Vertical gap between a block and the insertion menu opened from it
pub const MENU_OFFSET_Y: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Parse a key name as typed in the REPL (`enter`, `backspace`, `/`, `a`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "backspace" | "bs" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "escape" | "esc" => Key::Escape,
            "tab" => Key::Tab,
            "up" => Key::ArrowUp,
            "down" => Key::ArrowDown,
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            "slash" => Key::Char('/'),
            "space" => Key::Char(' '),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Where to place the caret when focusing a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaretPosition {
    Start,
    End,
}

/// Screen coordinates at which the insertion menu is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuAnchor {
    pub x: f64,
    pub y: f64,
}

impl MenuAnchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the element that received a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Menu anchor just below the element's left edge
    pub fn menu_anchor(&self) -> MenuAnchor {
        MenuAnchor::new(self.left, self.bottom() + MENU_OFFSET_Y)
    }
}

/// Metadata about the editable region a key was pressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyTarget {
    /// The region's live text is empty
    pub is_empty: bool,
    pub rect: TargetRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
    pub target: KeyTarget,
}

impl KeyEvent {
    /// A key pressed in a non-empty region, no modifiers
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            target: KeyTarget::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn on_empty(mut self) -> Self {
        self.target.is_empty = true;
        self
    }

    pub fn with_empty(mut self, is_empty: bool) -> Self {
        self.target.is_empty = is_empty;
        self
    }

    pub fn at(mut self, rect: TargetRect) -> Self {
        self.target.rect = rect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("bs"), Some(Key::Backspace));
        assert_eq!(Key::from_name("/"), Some(Key::Char('/')));
        assert_eq!(Key::from_name("slash"), Some(Key::Char('/')));
        assert_eq!(Key::from_name("x"), Some(Key::Char('x')));
        assert_eq!(Key::from_name("ctrl+x"), None);
    }

    #[test]
    fn test_menu_anchor_sits_below_target() {
        let rect = TargetRect {
            left: 120.0,
            top: 40.0,
            width: 300.0,
            height: 24.0,
        };
        assert_eq!(rect.menu_anchor(), MenuAnchor::new(120.0, 69.0));
    }

    #[test]
    fn test_key_event_builders() {
        let event = KeyEvent::new(Key::Enter).with_shift().on_empty();
        assert!(event.shift);
        assert!(event.target.is_empty);
    }
}
