//! Static tuning surface, loaded once at startup.
//!
//! ```toml
//! [timing]
//! plain_debounce_ms = 250
//! gesture_debounce_ms = 80
//! burst_window_ms = 350
//! toggle_after_repeats = 6
//!
//! [keymap]
//! base = ["A", "B", "C", "ENTER"]
//! alternate = ["X", "Y", "Z", "SPACE"]
//! ```
//!
//! Every field is optional and falls back to the values above.

use gpio_keyboard_keymap::{KeyMap, Keycode, Layer, NUM_CHANNELS};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Minimum spacing after an accepted plain-channel event.
pub const PLAIN_DEBOUNCE_MS: u64 = 250;
/// Minimum spacing, measured from the same timestamp, for the gesture channel.
pub const GESTURE_DEBOUNCE_MS: u64 = 80;
/// Maximum gap between gesture presses that keeps a burst alive.
pub const BURST_WINDOW_MS: u64 = 350;
/// Rapid presses counted before the next one toggles the layer.
pub const TOGGLE_AFTER_REPEATS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    pub plain_debounce_ms: u64,
    pub gesture_debounce_ms: u64,
    pub burst_window_ms: u64,
    pub toggle_after_repeats: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            plain_debounce_ms: PLAIN_DEBOUNCE_MS,
            gesture_debounce_ms: GESTURE_DEBOUNCE_MS,
            burst_window_ms: BURST_WINDOW_MS,
            toggle_after_repeats: TOGGLE_AFTER_REPEATS,
        }
    }
}

impl Timing {
    pub fn validate(&self) -> Result<(), Error> {
        if self.burst_window_ms == 0 {
            return Err(Error::InvalidTiming("burst_window_ms must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardConfig {
    pub timing: Timing,
    pub keymap: KeyMap,
}

/// On-disk shape: key names instead of codes.
#[derive(Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct KeymapFile {
    base: Vec<String>,
    alternate: Vec<String>,
}

impl From<&KeyMap> for KeymapFile {
    fn from(keymap: &KeyMap) -> Self {
        let names = |layer: Layer| -> Vec<String> {
            keymap
                .row(layer)
                .iter()
                .map(|kc| kc.display_name().to_string())
                .collect()
        };
        Self {
            base: names(Layer::Base),
            alternate: names(Layer::Alternate),
        }
    }
}

impl Default for KeymapFile {
    fn default() -> Self {
        Self::from(&KeyMap::DEFAULT)
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    timing: Timing,
    keymap: KeymapFile,
}

fn parse_row(layer: &'static str, names: &[String]) -> Result<[Keycode; NUM_CHANNELS], Error> {
    if names.len() != NUM_CHANNELS {
        return Err(Error::KeymapRow {
            layer,
            len: names.len(),
        });
    }
    let mut row = [Keycode::A; NUM_CHANNELS];
    for (slot, name) in row.iter_mut().zip(names) {
        *slot = Keycode::from_name(name).ok_or_else(|| Error::UnknownKey(name.clone()))?;
    }
    Ok(row)
}

impl KeyboardConfig {
    pub fn from_toml(input: &str) -> Result<Self, Error> {
        let file: ConfigFile = toml::from_str(input)?;
        file.timing.validate()?;
        let keymap = KeyMap::new([
            parse_row("base", &file.keymap.base)?,
            parse_row("alternate", &file.keymap.alternate)?,
        ]);
        Ok(Self {
            timing: file.timing,
            keymap,
        })
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        let file = ConfigFile {
            timing: self.timing,
            keymap: KeymapFile::from(&self.keymap),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpio_keyboard_keymap::Channel;

    #[test]
    fn test_empty_config_is_default() {
        let config = KeyboardConfig::from_toml("").unwrap();
        assert_eq!(config, KeyboardConfig::default());
        assert_eq!(config.timing.plain_debounce_ms, 250);
        assert_eq!(config.timing.gesture_debounce_ms, 80);
        assert_eq!(config.timing.burst_window_ms, 350);
        assert_eq!(config.timing.toggle_after_repeats, 6);
        assert_eq!(config.keymap, KeyMap::DEFAULT);
    }

    #[test]
    fn test_partial_config() {
        let config = KeyboardConfig::from_toml(
            "[timing]\nburst_window_ms = 500\n\n[keymap]\nalternate = [\"KEY_1\", \"2\", \"3\", \"tab\"]\n",
        )
        .unwrap();
        assert_eq!(config.timing.burst_window_ms, 500);
        assert_eq!(config.timing.plain_debounce_ms, 250);
        assert_eq!(config.keymap.row(Layer::Base), KeyMap::DEFAULT.row(Layer::Base));
        assert_eq!(
            config.keymap.lookup(Layer::Alternate, Channel::GESTURE),
            Keycode::Tab
        );
    }

    #[test]
    fn test_unknown_key_name() {
        let err = KeyboardConfig::from_toml("[keymap]\nbase = [\"A\", \"B\", \"C\", \"HYPER\"]\n")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKey(ref name) if name == "HYPER"));
    }

    #[test]
    fn test_short_row() {
        let err = KeyboardConfig::from_toml("[keymap]\nbase = [\"A\", \"B\"]\n").unwrap_err();
        assert!(matches!(err, Error::KeymapRow { layer: "base", len: 2 }));
    }

    #[test]
    fn test_zero_burst_window_rejected() {
        let err = KeyboardConfig::from_toml("[timing]\nburst_window_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidTiming(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = KeyboardConfig::from_toml("[timing]\ndebounce = 10\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_dump_reloads() {
        let mut config = KeyboardConfig::default();
        config.timing.gesture_debounce_ms = 40;
        let text = config.to_toml().unwrap();
        assert!(text.contains("gesture_debounce_ms = 40"));
        assert_eq!(KeyboardConfig::from_toml(&text).unwrap(), config);
    }
}
