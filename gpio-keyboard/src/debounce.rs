//! Debounce gate shared by every channel.
//!
//! All four lines compare against one timestamp: the last accepted plain
//! channel event. Plain channels need 250ms of quiet since then, the gesture
//! channel only 80ms so that deliberate rapid repeats survive. The gate
//! itself never mutates anything; the router decides when the timestamp moves.

use gpio_keyboard_keymap::Channel;

use crate::config::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceGate {
    plain_window_ms: u64,
    gesture_window_ms: u64,
}

impl DebounceGate {
    pub fn new(timing: &Timing) -> Self {
        Self {
            plain_window_ms: timing.plain_debounce_ms,
            gesture_window_ms: timing.gesture_debounce_ms,
        }
    }

    /// Minimum spacing required for `channel`.
    pub fn window(&self, channel: Channel) -> u64 {
        if channel.is_gesture() {
            self.gesture_window_ms
        } else {
            self.plain_window_ms
        }
    }

    /// Decide whether an edge on `channel` at `now` is a real event.
    ///
    /// `last_accepted` is `None` until the first plain event is accepted, in
    /// which case every edge passes. A `now` earlier than `last_accepted`
    /// counts as zero elapsed time.
    pub fn accept(&self, channel: Channel, last_accepted: Option<u64>, now: u64) -> bool {
        match last_accepted {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.window(channel),
        }
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(&Timing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(i: u8) -> Channel {
        Channel::new(i).unwrap()
    }

    #[test]
    fn test_first_event_always_passes() {
        let gate = DebounceGate::default();
        for channel in Channel::all() {
            assert!(gate.accept(channel, None, 0));
        }
    }

    #[test]
    fn test_plain_window() {
        let gate = DebounceGate::default();
        assert!(!gate.accept(ch(0), Some(1000), 1100));
        assert!(!gate.accept(ch(2), Some(1000), 1249));
        assert!(gate.accept(ch(1), Some(1000), 1250));
    }

    #[test]
    fn test_gesture_window() {
        let gate = DebounceGate::default();
        assert!(!gate.accept(Channel::GESTURE, Some(1000), 1079));
        assert!(gate.accept(Channel::GESTURE, Some(1000), 1080));
    }

    #[test]
    fn test_time_going_backwards_is_rejected() {
        let gate = DebounceGate::default();
        assert!(!gate.accept(ch(0), Some(1000), 900));
    }
}
