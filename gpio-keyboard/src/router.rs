//! Channel event router: the single entry point for every raw edge.
//!
//! All mutable state lives in one context behind one mutex, and every call
//! holds that lock for its whole body, so edges arriving concurrently from
//! the four lines are fully serialized.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use gpio_keyboard_keymap::{Channel, Keycode, Layer};
use log::{debug, info};

use crate::clock::Clock;
use crate::config::KeyboardConfig;
use crate::debounce::DebounceGate;
use crate::dispatch::{KeyDispatcher, KeySink};
use crate::error::Error;
use crate::gesture::{GestureDecision, GestureDetector};

/// What happened to one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Rejected by the debounce gate.
    Debounced,
    /// A tap for this code was emitted.
    Tapped(Keycode),
    /// Gesture press swallowed while a burst is counting.
    Counted { presses: u32 },
    /// Gesture threshold reached; the new active layer.
    LayerToggled(Layer),
}

impl fmt::Display for EdgeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOutcome::Debounced => f.write_str("debounced"),
            EdgeOutcome::Tapped(code) => write!(f, "tap {}", code),
            EdgeOutcome::Counted { presses } => write!(f, "swallowed (burst press {})", presses),
            EdgeOutcome::LayerToggled(layer) => write!(f, "layer -> {}", layer),
        }
    }
}

/// Point-in-time copy of the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSnapshot {
    pub layer: Layer,
    pub presses: u32,
    pub last_accepted: Option<u64>,
    pub last_gesture: Option<u64>,
}

struct Context<S> {
    layer: Layer,
    /// Written only by accepted plain-channel events, read for every channel.
    last_accepted: Option<u64>,
    gesture: GestureDetector,
    sink: S,
}

/// The keyboard core: owns the shared state and the output sink.
///
/// `Keyboard` is `Sync`, so edge sources on different threads can share it
/// through an `Arc`.
pub struct Keyboard<S> {
    gate: DebounceGate,
    dispatcher: KeyDispatcher,
    context: Mutex<Context<S>>,
}

impl<S: KeySink> Keyboard<S> {
    pub fn new(config: &KeyboardConfig, sink: S) -> Self {
        Self {
            gate: DebounceGate::new(&config.timing),
            dispatcher: KeyDispatcher::new(config.keymap),
            context: Mutex::new(Context {
                layer: Layer::default(),
                last_accepted: None,
                gesture: GestureDetector::new(&config.timing),
                sink,
            }),
        }
    }

    pub fn with_defaults(sink: S) -> Self {
        Self::new(&KeyboardConfig::default(), sink)
    }

    // The context is plain data and consistent whenever the lock is
    // released, so a panic in a sink does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Context<S>> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one edge on `channel` observed at `now` milliseconds.
    pub fn on_edge(&self, channel: Channel, now: u64) -> EdgeOutcome {
        let mut ctx = self.lock();
        self.process(&mut ctx, channel, now)
    }

    /// Like [`Keyboard::on_edge`] but for an unchecked line index.
    pub fn on_edge_raw(&self, index: u8, now: u64) -> Result<EdgeOutcome, Error> {
        let channel = Channel::try_from(index)?;
        Ok(self.on_edge(channel, now))
    }

    /// Process one edge, reading the clock inside the critical section so
    /// timestamps seen by the core never go backwards.
    pub fn on_edge_now(&self, channel: Channel, clock: &dyn Clock) -> EdgeOutcome {
        let mut ctx = self.lock();
        let now = clock.now_millis();
        self.process(&mut ctx, channel, now)
    }

    fn process(&self, ctx: &mut Context<S>, channel: Channel, now: u64) -> EdgeOutcome {
        if !self.gate.accept(channel, ctx.last_accepted, now) {
            debug!("channel {} debounced at {}ms", channel, now);
            return EdgeOutcome::Debounced;
        }

        if !channel.is_gesture() {
            let code = self.dispatcher.dispatch(&mut ctx.sink, ctx.layer, channel);
            ctx.last_accepted = Some(now);
            // Any ordinary keypress cancels a gesture burst.
            ctx.gesture.reset();
            return EdgeOutcome::Tapped(code);
        }

        match ctx.gesture.on_press(now) {
            GestureDecision::Tap => {
                let code = self.dispatcher.dispatch(&mut ctx.sink, ctx.layer, channel);
                EdgeOutcome::Tapped(code)
            }
            GestureDecision::Counted(presses) => {
                debug!("gesture press {} swallowed at {}ms", presses, now);
                EdgeOutcome::Counted { presses }
            }
            GestureDecision::Toggle => {
                ctx.layer = ctx.layer.toggled();
                info!("layer toggled to {} at {}ms", ctx.layer, now);
                EdgeOutcome::LayerToggled(ctx.layer)
            }
        }
    }

    pub fn layer(&self) -> Layer {
        self.lock().layer
    }

    pub fn snapshot(&self) -> CoreSnapshot {
        let ctx = self.lock();
        CoreSnapshot {
            layer: ctx.layer,
            presses: ctx.gesture.presses(),
            last_accepted: ctx.last_accepted,
            last_gesture: ctx.gesture.last_press(),
        }
    }

    /// Run `f` against the sink while holding the lock.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().sink)
    }

    pub fn into_sink(self) -> S {
        self.context
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .sink
    }
}
