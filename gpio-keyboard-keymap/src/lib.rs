//! Shared key codes, channel and layer types for the GPIO keyboard.
//!
//! This crate is `no_std`-compatible so the same tables serve the event
//! core and the host CLI tool.

#![cfg_attr(not(test), no_std)]

use core::fmt;

/// Number of layers (rows of the key map).
pub const NUM_LAYERS: usize = 2;
/// Number of physical input lines (columns of the key map).
pub const NUM_CHANNELS: usize = 4;
/// Index of the line that doubles as the layer-toggle control.
pub const GESTURE_CHANNEL: u8 = 3;

/// Linux input-event key codes.
/// See `include/uapi/linux/input-event-codes.h`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Keycode {
    // Control keys
    Esc = 1,

    // Numbers
    N1 = 2,
    N2 = 3,
    N3 = 4,
    N4 = 5,
    N5 = 6,
    N6 = 7,
    N7 = 8,
    N8 = 9,
    N9 = 10,
    N0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,
    Tab = 15,

    // Letters and punctuation
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    LeftBrace = 26,
    RightBrace = 27,
    Enter = 28,
    LeftCtrl = 29,
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,
    RightShift = 54,
    LeftAlt = 56,
    Space = 57,
    CapsLock = 58,

    // Function keys
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    F11 = 87,
    F12 = 88,

    // Navigation
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    End = 107,
    Down = 108,
    PageDown = 109,
    Insert = 110,
    Delete = 111,
}

impl Keycode {
    /// Every key code this crate knows about, in code order.
    pub const ALL: [Keycode; 79] = [
        Keycode::Esc,
        Keycode::N1,
        Keycode::N2,
        Keycode::N3,
        Keycode::N4,
        Keycode::N5,
        Keycode::N6,
        Keycode::N7,
        Keycode::N8,
        Keycode::N9,
        Keycode::N0,
        Keycode::Minus,
        Keycode::Equal,
        Keycode::Backspace,
        Keycode::Tab,
        Keycode::Q,
        Keycode::W,
        Keycode::E,
        Keycode::R,
        Keycode::T,
        Keycode::Y,
        Keycode::U,
        Keycode::I,
        Keycode::O,
        Keycode::P,
        Keycode::LeftBrace,
        Keycode::RightBrace,
        Keycode::Enter,
        Keycode::LeftCtrl,
        Keycode::A,
        Keycode::S,
        Keycode::D,
        Keycode::F,
        Keycode::G,
        Keycode::H,
        Keycode::J,
        Keycode::K,
        Keycode::L,
        Keycode::Semicolon,
        Keycode::Apostrophe,
        Keycode::Grave,
        Keycode::LeftShift,
        Keycode::Backslash,
        Keycode::Z,
        Keycode::X,
        Keycode::C,
        Keycode::V,
        Keycode::B,
        Keycode::N,
        Keycode::M,
        Keycode::Comma,
        Keycode::Dot,
        Keycode::Slash,
        Keycode::RightShift,
        Keycode::LeftAlt,
        Keycode::Space,
        Keycode::CapsLock,
        Keycode::F1,
        Keycode::F2,
        Keycode::F3,
        Keycode::F4,
        Keycode::F5,
        Keycode::F6,
        Keycode::F7,
        Keycode::F8,
        Keycode::F9,
        Keycode::F10,
        Keycode::F11,
        Keycode::F12,
        Keycode::Home,
        Keycode::Up,
        Keycode::PageUp,
        Keycode::Left,
        Keycode::Right,
        Keycode::End,
        Keycode::Down,
        Keycode::PageDown,
        Keycode::Insert,
        Keycode::Delete,
    ];

    /// Raw code as reported to the input subsystem.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Name without the `KEY_` prefix, as used in config files and diagrams.
    pub fn display_name(self) -> &'static str {
        match self {
            Keycode::Esc => "ESC",
            Keycode::N1 => "1",
            Keycode::N2 => "2",
            Keycode::N3 => "3",
            Keycode::N4 => "4",
            Keycode::N5 => "5",
            Keycode::N6 => "6",
            Keycode::N7 => "7",
            Keycode::N8 => "8",
            Keycode::N9 => "9",
            Keycode::N0 => "0",
            Keycode::Minus => "MINUS",
            Keycode::Equal => "EQUAL",
            Keycode::Backspace => "BACKSPACE",
            Keycode::Tab => "TAB",
            Keycode::Q => "Q",
            Keycode::W => "W",
            Keycode::E => "E",
            Keycode::R => "R",
            Keycode::T => "T",
            Keycode::Y => "Y",
            Keycode::U => "U",
            Keycode::I => "I",
            Keycode::O => "O",
            Keycode::P => "P",
            Keycode::LeftBrace => "LEFTBRACE",
            Keycode::RightBrace => "RIGHTBRACE",
            Keycode::Enter => "ENTER",
            Keycode::LeftCtrl => "LEFTCTRL",
            Keycode::A => "A",
            Keycode::S => "S",
            Keycode::D => "D",
            Keycode::F => "F",
            Keycode::G => "G",
            Keycode::H => "H",
            Keycode::J => "J",
            Keycode::K => "K",
            Keycode::L => "L",
            Keycode::Semicolon => "SEMICOLON",
            Keycode::Apostrophe => "APOSTROPHE",
            Keycode::Grave => "GRAVE",
            Keycode::LeftShift => "LEFTSHIFT",
            Keycode::Backslash => "BACKSLASH",
            Keycode::Z => "Z",
            Keycode::X => "X",
            Keycode::C => "C",
            Keycode::V => "V",
            Keycode::B => "B",
            Keycode::N => "N",
            Keycode::M => "M",
            Keycode::Comma => "COMMA",
            Keycode::Dot => "DOT",
            Keycode::Slash => "SLASH",
            Keycode::RightShift => "RIGHTSHIFT",
            Keycode::LeftAlt => "LEFTALT",
            Keycode::Space => "SPACE",
            Keycode::CapsLock => "CAPSLOCK",
            Keycode::F1 => "F1",
            Keycode::F2 => "F2",
            Keycode::F3 => "F3",
            Keycode::F4 => "F4",
            Keycode::F5 => "F5",
            Keycode::F6 => "F6",
            Keycode::F7 => "F7",
            Keycode::F8 => "F8",
            Keycode::F9 => "F9",
            Keycode::F10 => "F10",
            Keycode::F11 => "F11",
            Keycode::F12 => "F12",
            Keycode::Home => "HOME",
            Keycode::Up => "UP",
            Keycode::PageUp => "PAGEUP",
            Keycode::Left => "LEFT",
            Keycode::Right => "RIGHT",
            Keycode::End => "END",
            Keycode::Down => "DOWN",
            Keycode::PageDown => "PAGEDOWN",
            Keycode::Insert => "INSERT",
            Keycode::Delete => "DELETE",
        }
    }

    /// Parse a key name, with or without the `KEY_` prefix, ignoring case.
    pub fn from_name(name: &str) -> Option<Keycode> {
        let name = name.trim();
        let bare = match name.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("KEY_") => &name[4..],
            _ => name,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|kc| kc.display_name().eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.display_name())
    }
}

/// One physical input line, `0..NUM_CHANNELS`.
///
/// Channel 3 is the gesture channel; channels 0-2 are plain channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    pub const GESTURE: Channel = Channel(GESTURE_CHANNEL);

    /// Build a channel, or `None` if `index` is out of range.
    pub const fn new(index: u8) -> Option<Channel> {
        if (index as usize) < NUM_CHANNELS {
            Some(Channel(index))
        } else {
            None
        }
    }

    /// All four channels in index order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..NUM_CHANNELS as u8).map(Channel)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_gesture(self) -> bool {
        self.0 == GESTURE_CHANNEL
    }
}

/// Error returned when a raw line index does not name a channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidChannel(pub u8);

impl fmt::Display for InvalidChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel {} out of range (expected 0..{})",
            self.0, NUM_CHANNELS
        )
    }
}

impl core::error::Error for InvalidChannel {}

impl TryFrom<u8> for Channel {
    type Error = InvalidChannel;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Channel::new(index).ok_or(InvalidChannel(index))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Active row of the key map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layer {
    #[default]
    Base,
    Alternate,
}

impl Layer {
    pub fn index(self) -> usize {
        match self {
            Layer::Base => 0,
            Layer::Alternate => 1,
        }
    }

    /// The other layer.
    pub fn toggled(self) -> Layer {
        match self {
            Layer::Base => Layer::Alternate,
            Layer::Alternate => Layer::Base,
        }
    }

    pub fn all() -> [Layer; NUM_LAYERS] {
        [Layer::Base, Layer::Alternate]
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Base => f.write_str("base"),
            Layer::Alternate => f.write_str("alternate"),
        }
    }
}

/// Shorthand aliases for readability.
const ENT: Keycode = Keycode::Enter;
const SPC: Keycode = Keycode::Space;

/// Fixed 2×4 table of key codes, indexed by (layer, channel).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyMap {
    rows: [[Keycode; NUM_CHANNELS]; NUM_LAYERS],
}

impl KeyMap {
    /// Layer 0: A, B, C, Enter
    /// Layer 1: X, Y, Z, Space
    pub const DEFAULT: KeyMap = KeyMap::new([
        [Keycode::A, Keycode::B, Keycode::C, ENT],
        [Keycode::X, Keycode::Y, Keycode::Z, SPC],
    ]);

    pub const fn new(rows: [[Keycode; NUM_CHANNELS]; NUM_LAYERS]) -> Self {
        Self { rows }
    }

    /// Key code for a (layer, channel) pair. Total over every pair.
    pub fn lookup(&self, layer: Layer, channel: Channel) -> Keycode {
        self.rows[layer.index()][channel.index()]
    }

    pub fn row(&self, layer: Layer) -> &[Keycode; NUM_CHANNELS] {
        &self.rows[layer.index()]
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_codes() {
        assert_eq!(Keycode::A.code(), 30);
        assert_eq!(Keycode::B.code(), 48);
        assert_eq!(Keycode::C.code(), 46);
        assert_eq!(Keycode::Enter.code(), 28);
        assert_eq!(Keycode::X.code(), 45);
        assert_eq!(Keycode::Y.code(), 21);
        assert_eq!(Keycode::Z.code(), 44);
        assert_eq!(Keycode::Space.code(), 57);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Keycode::from_name("a"), Some(Keycode::A));
        assert_eq!(Keycode::from_name("KEY_ENTER"), Some(Keycode::Enter));
        assert_eq!(Keycode::from_name("key_space"), Some(Keycode::Space));
        assert_eq!(Keycode::from_name("1"), Some(Keycode::N1));
        assert_eq!(Keycode::from_name("KEY_"), None);
        assert_eq!(Keycode::from_name("nope"), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in Keycode::ALL.iter().enumerate() {
            for b in &Keycode::ALL[i + 1..] {
                assert_ne!(a.display_name(), b.display_name());
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_channel_range() {
        assert!(Channel::new(3).is_some());
        assert!(Channel::new(4).is_none());
        assert_eq!(Channel::try_from(7u8), Err(InvalidChannel(7)));
        assert!(Channel::GESTURE.is_gesture());
        assert!(!Channel::new(0).unwrap().is_gesture());
        assert_eq!(Channel::all().count(), NUM_CHANNELS);
    }

    #[test]
    fn test_layer_toggle() {
        assert_eq!(Layer::default(), Layer::Base);
        assert_eq!(Layer::Base.toggled(), Layer::Alternate);
        assert_eq!(Layer::Alternate.toggled(), Layer::Base);
    }

    #[test]
    fn test_default_keymap() {
        let map = KeyMap::DEFAULT;
        let ch = |i| Channel::new(i).unwrap();
        assert_eq!(map.lookup(Layer::Base, ch(0)), Keycode::A);
        assert_eq!(map.lookup(Layer::Base, ch(3)), Keycode::Enter);
        assert_eq!(map.lookup(Layer::Alternate, ch(2)), Keycode::Z);
        assert_eq!(map.lookup(Layer::Alternate, ch(3)), Keycode::Space);
    }
}
