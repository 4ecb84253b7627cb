//! Key dispatch into the virtual keyboard.

use gpio_keyboard_keymap::{Channel, KeyMap, Keycode, Layer};
use log::trace;

/// Receiver of synthesized key events, normally the virtual input device.
///
/// Calls are fire-and-forget: failures belong to the implementation.
pub trait KeySink: Send {
    fn key_down(&mut self, code: Keycode);
    fn key_up(&mut self, code: Keycode);
}

impl<S: KeySink + ?Sized> KeySink for &mut S {
    fn key_down(&mut self, code: Keycode) {
        (**self).key_down(code)
    }

    fn key_up(&mut self, code: Keycode) {
        (**self).key_up(code)
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn key_down(&mut self, code: Keycode) {
        (**self).key_down(code)
    }

    fn key_up(&mut self, code: Keycode) {
        (**self).key_up(code)
    }
}

/// One emitted key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: Keycode,
    pub pressed: bool,
}

/// Sink that keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<KeyEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Codes of every key-down, i.e. one entry per tap.
    pub fn taps(&self) -> Vec<Keycode> {
        self.events
            .iter()
            .filter(|e| e.pressed)
            .map(|e| e.code)
            .collect()
    }
}

impl KeySink for RecordingSink {
    fn key_down(&mut self, code: Keycode) {
        self.events.push(KeyEvent {
            code,
            pressed: true,
        });
    }

    fn key_up(&mut self, code: Keycode) {
        self.events.push(KeyEvent {
            code,
            pressed: false,
        });
    }
}

/// Resolves (layer, channel) through the key map and emits a full tap.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDispatcher {
    keymap: KeyMap,
}

impl KeyDispatcher {
    pub fn new(keymap: KeyMap) -> Self {
        Self { keymap }
    }

    /// Emit key-down then key-up for the mapped code and return it.
    ///
    /// Edge direction is not part of the contract: every accepted edge is a
    /// complete tap.
    pub fn dispatch<S: KeySink + ?Sized>(
        &self,
        sink: &mut S,
        layer: Layer,
        channel: Channel,
    ) -> Keycode {
        let code = self.keymap.lookup(layer, channel);
        trace!("tap {} (layer {}, channel {})", code, layer, channel);
        sink.key_down(code);
        sink.key_up(code);
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_emits_down_then_up() {
        let dispatcher = KeyDispatcher::default();
        for layer in Layer::all() {
            for channel in Channel::all() {
                let mut sink = RecordingSink::new();
                let code = dispatcher.dispatch(&mut sink, layer, channel);
                assert_eq!(code, KeyMap::DEFAULT.lookup(layer, channel));
                assert_eq!(
                    sink.events(),
                    &[
                        KeyEvent { code, pressed: true },
                        KeyEvent { code, pressed: false },
                    ]
                );
            }
        }
    }

    #[test]
    fn test_dispatch_custom_keymap() {
        let keymap = KeyMap::new([
            [Keycode::N1, Keycode::N2, Keycode::N3, Keycode::Tab],
            [Keycode::F1, Keycode::F2, Keycode::F3, Keycode::Esc],
        ]);
        let dispatcher = KeyDispatcher::new(keymap);
        let mut sink = RecordingSink::new();
        dispatcher.dispatch(&mut sink, Layer::Alternate, Channel::GESTURE);
        dispatcher.dispatch(&mut sink, Layer::Base, Channel::new(1).unwrap());
        assert_eq!(sink.taps(), vec![Keycode::Esc, Keycode::N2]);
    }

    #[test]
    fn test_boxed_sink() {
        let dispatcher = KeyDispatcher::default();
        let mut sink: Box<RecordingSink> = Box::default();
        dispatcher.dispatch(&mut sink, Layer::Base, Channel::GESTURE);
        assert_eq!(sink.taps(), vec![Keycode::Enter]);
    }
}
