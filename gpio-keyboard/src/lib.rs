//! Event core of the GPIO keyboard.
//!
//! Turns raw edge notifications on four input lines into debounced key taps:
//! - a shared debounce gate (250ms plain, 80ms gesture)
//! - a rapid-repeat detector on channel 3 that toggles between two layers
//! - a dispatcher that emits key-down/key-up pairs to a [`KeySink`]
//!
//! Acquiring the lines and registering the virtual input device are left to
//! the caller, which feeds edges into [`Keyboard::on_edge`].

pub mod clock;
pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod router;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{KeyboardConfig, Timing};
pub use dispatch::{KeyDispatcher, KeyEvent, KeySink, RecordingSink};
pub use error::Error;
pub use gpio_keyboard_keymap::{Channel, KeyMap, Keycode, Layer};
pub use router::{CoreSnapshot, EdgeOutcome, Keyboard};
