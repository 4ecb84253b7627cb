//! Error type shared by the core's configuration and entry points.

use std::fmt;

use gpio_keyboard_keymap::{InvalidChannel, NUM_CHANNELS};

/// Errors surfaced by the keyboard core.
///
/// Debounce rejections and swallowed gesture presses are not errors; they
/// are reported through [`crate::EdgeOutcome`].
#[derive(Debug)]
pub enum Error {
    /// A raw line index outside `0..NUM_CHANNELS` reached the core.
    InvalidChannel(u8),
    /// A key name in the config file did not match any known key code.
    UnknownKey(String),
    /// A keymap row did not have exactly one entry per channel.
    KeymapRow { layer: &'static str, len: usize },
    /// A timing constant that would make the core unusable.
    InvalidTiming(&'static str),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel(index) => write!(f, "{}", InvalidChannel(*index)),
            Error::UnknownKey(name) => write!(f, "unknown key name {:?}", name),
            Error::KeymapRow { layer, len } => write!(
                f,
                "keymap row {:?} has {} entries, expected {}",
                layer, len, NUM_CHANNELS
            ),
            Error::InvalidTiming(msg) => write!(f, "invalid timing: {}", msg),
            Error::Parse(_) => f.write_str("failed to parse config"),
            Error::Serialize(_) => f.write_str("failed to serialize config"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidChannel> for Error {
    fn from(e: InvalidChannel) -> Self {
        Error::InvalidChannel(e.0)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialize(e)
    }
}
