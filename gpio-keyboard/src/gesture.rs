//! Rapid-repeat detector for the gesture channel.
//!
//! A press that arrives within the burst window of the previous gesture press
//! is swallowed and counted. Once more than `toggle_after_repeats` presses
//! have been counted, the next rapid press toggles the layer instead. A press
//! after a quiet gap opens a new burst and is delivered as a normal tap.
//!
//! Presses swallowed by a burst that stalls before reaching the threshold are
//! dropped, never replayed as taps.

use crate::config::Timing;

/// What the router should do with a gesture press that passed debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureDecision {
    /// Quiet gap before this press: emit an ordinary tap.
    Tap,
    /// Swallowed inside a burst; `presses` is the counter after this press.
    Counted(u32),
    /// Threshold reached: flip the layer, emit nothing.
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureDetector {
    burst_window_ms: u64,
    toggle_after: u32,
    /// Rapid presses counted in the current burst.
    presses: u32,
    /// Time of the last gesture press that passed debouncing.
    last_press: Option<u64>,
}

impl GestureDetector {
    pub fn new(timing: &Timing) -> Self {
        Self {
            burst_window_ms: timing.burst_window_ms,
            toggle_after: timing.toggle_after_repeats,
            presses: 0,
            last_press: None,
        }
    }

    /// Feed one debounced gesture press at `now`.
    pub fn on_press(&mut self, now: u64) -> GestureDecision {
        let rapid = match self.last_press {
            Some(last) => now.saturating_sub(last) < self.burst_window_ms,
            None => false,
        };
        self.last_press = Some(now);

        if !rapid {
            self.presses = 0;
            return GestureDecision::Tap;
        }

        if self.presses > self.toggle_after {
            self.presses = 0;
            GestureDecision::Toggle
        } else {
            self.presses = self.presses.saturating_add(1);
            GestureDecision::Counted(self.presses)
        }
    }

    /// Abandon the burst in progress. The last press time is kept.
    pub fn reset(&mut self) {
        self.presses = 0;
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    pub fn last_press(&self) -> Option<u64> {
        self.last_press
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(&Timing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_is_a_tap() {
        let mut g = GestureDetector::default();
        assert_eq!(g.on_press(0), GestureDecision::Tap);
        assert_eq!(g.presses(), 0);
        assert_eq!(g.last_press(), Some(0));
    }

    #[test]
    fn test_spaced_presses_are_taps() {
        let mut g = GestureDetector::default();
        assert_eq!(g.on_press(0), GestureDecision::Tap);
        assert_eq!(g.on_press(350), GestureDecision::Tap);
        assert_eq!(g.on_press(1000), GestureDecision::Tap);
        assert_eq!(g.presses(), 0);
    }

    #[test]
    fn test_toggle_on_eighth_rapid_press() {
        let mut g = GestureDetector::default();
        assert_eq!(g.on_press(0), GestureDecision::Tap);
        for i in 1..=7u32 {
            assert_eq!(g.on_press(u64::from(i) * 100), GestureDecision::Counted(i));
        }
        assert_eq!(g.on_press(800), GestureDecision::Toggle);
        assert_eq!(g.presses(), 0);
        assert_eq!(g.last_press(), Some(800));
        // The press right after a toggle starts counting again.
        assert_eq!(g.on_press(900), GestureDecision::Counted(1));
    }

    #[test]
    fn test_stalled_burst_restarts_with_tap() {
        let mut g = GestureDetector::default();
        g.on_press(0);
        assert_eq!(g.on_press(100), GestureDecision::Counted(1));
        assert_eq!(g.on_press(200), GestureDecision::Counted(2));
        assert_eq!(g.on_press(600), GestureDecision::Tap);
        assert_eq!(g.presses(), 0);
    }

    #[test]
    fn test_window_is_measured_from_previous_press() {
        let mut g = GestureDetector::default();
        g.on_press(0);
        // Each gap is under 350ms even though the burst spans much longer.
        for i in 1..=7u32 {
            assert_eq!(g.on_press(u64::from(i) * 340), GestureDecision::Counted(i));
        }
        assert_eq!(g.on_press(8 * 340), GestureDecision::Toggle);
    }

    #[test]
    fn test_reset_keeps_last_press() {
        let mut g = GestureDetector::default();
        g.on_press(0);
        g.on_press(100);
        g.reset();
        assert_eq!(g.presses(), 0);
        assert_eq!(g.on_press(200), GestureDecision::Counted(1));
    }

    #[test]
    fn test_custom_threshold() {
        let timing = Timing {
            toggle_after_repeats: 1,
            ..Timing::default()
        };
        let mut g = GestureDetector::new(&timing);
        g.on_press(0);
        assert_eq!(g.on_press(100), GestureDecision::Counted(1));
        assert_eq!(g.on_press(200), GestureDecision::Counted(2));
        assert_eq!(g.on_press(300), GestureDecision::Toggle);
    }
}
