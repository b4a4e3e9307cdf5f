//! Canonical key vocabulary
//!
//! Folds raw `rdev` keys (and configuration key names) into a small set of
//! lower-case tokens. Left/right modifier variants collapse to one token.

use std::fmt;

use rdev::Key;

/// Modifier tokens in display order
pub const MODIFIER_ORDER: [&str; 4] = ["ctrl", "alt", "shift", "cmd"];

/// A normalized key token such as `ctrl`, `q` or `page_up`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Build a token from a configuration key name
    ///
    /// Case-insensitive. Accepts the modifier aliases `control`/`ctl`,
    /// `command`, `option` and side-specific names like `shift_r`.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.trim().to_lowercase();
        let folded = match lowered.as_str() {
            "control" | "ctl" | "ctrl_l" | "ctrl_r" => "ctrl",
            "command" | "cmd_l" | "cmd_r" => "cmd",
            "option" | "alt_l" | "alt_r" | "alt_gr" => "alt",
            "shift_l" | "shift_r" => "shift",
            _ => return Self(lowered),
        };
        Self(folded.to_owned())
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Position in [`MODIFIER_ORDER`], or `None` for plain keys
    pub fn modifier_rank(&self) -> Option<usize> {
        MODIFIER_ORDER.iter().position(|m| *m == self.0)
    }

    /// Whether this token is one of ctrl/alt/shift/cmd
    pub fn is_modifier(&self) -> bool {
        self.modifier_rank().is_some()
    }

    /// Display form: first letter upper-cased (`page_up` -> `Page_up`)
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map a raw key to its canonical token. Pure and total.
pub fn normalize(key: Key) -> CanonicalKey {
    let token = match key {
        Key::ControlLeft | Key::ControlRight => "ctrl",
        Key::ShiftLeft | Key::ShiftRight => "shift",
        Key::Alt | Key::AltGr => "alt",
        Key::MetaLeft | Key::MetaRight => "cmd",

        Key::KeyA => "a",
        Key::KeyB => "b",
        Key::KeyC => "c",
        Key::KeyD => "d",
        Key::KeyE => "e",
        Key::KeyF => "f",
        Key::KeyG => "g",
        Key::KeyH => "h",
        Key::KeyI => "i",
        Key::KeyJ => "j",
        Key::KeyK => "k",
        Key::KeyL => "l",
        Key::KeyM => "m",
        Key::KeyN => "n",
        Key::KeyO => "o",
        Key::KeyP => "p",
        Key::KeyQ => "q",
        Key::KeyR => "r",
        Key::KeyS => "s",
        Key::KeyT => "t",
        Key::KeyU => "u",
        Key::KeyV => "v",
        Key::KeyW => "w",
        Key::KeyX => "x",
        Key::KeyY => "y",
        Key::KeyZ => "z",

        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",

        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",

        Key::Space => "space",
        Key::Return | Key::KpReturn => "enter",
        Key::Escape => "esc",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Delete | Key::KpDelete => "delete",
        Key::Insert => "insert",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "page_up",
        Key::PageDown => "page_down",
        Key::UpArrow => "up",
        Key::DownArrow => "down",
        Key::LeftArrow => "left",
        Key::RightArrow => "right",
        Key::CapsLock => "caps_lock",
        Key::NumLock => "num_lock",
        Key::ScrollLock => "scroll_lock",
        Key::PrintScreen => "print_screen",
        Key::Pause => "pause",

        Key::Minus | Key::KpMinus => "-",
        Key::Equal => "=",
        // `+` separates combo tokens, so the keypad plus gets a name
        Key::KpPlus => "plus",
        Key::KpMultiply => "*",
        Key::KpDivide => "/",
        Key::LeftBracket => "[",
        Key::RightBracket => "]",
        Key::SemiColon => ";",
        Key::Quote => "'",
        Key::BackSlash | Key::IntlBackslash => "\\",
        Key::Comma => ",",
        Key::Dot => ".",
        Key::Slash => "/",
        Key::BackQuote => "`",

        other => return CanonicalKey(format!("{other:?}").to_lowercase()),
    };
    CanonicalKey(token.to_owned())
}
