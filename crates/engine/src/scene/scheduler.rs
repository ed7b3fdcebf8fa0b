//! Frame scheduler: repeating per-frame callbacks plus a coarse interval
//! timer for work that runs at its own cadence, like the ambient effect tick.
//! The host supplies a monotonic `now`; nothing here reads the wall clock.

use std::time::Duration;

use tracing::debug;

use crate::sim::movement::MAX_FRAME_DT;

/// Ambient effect cadence, decoupled from the frame rate.
pub const EFFECT_TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// What every callback sees each frame: the monotonic timestamp and the
/// clamped frame delta in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub now: Duration,
    pub dt: f32,
}

type FrameCallback = Box<dyn FnMut(FrameTick)>;

#[derive(Default)]
pub struct FrameScheduler {
    callbacks: Vec<(CallbackId, FrameCallback)>,
    next_id: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repeating callback, invoked on every `run_frame` until
    /// cancelled.
    pub fn register(&mut self, callback: impl FnMut(FrameTick) + 'static) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns whether anything was removed; cancelling
    /// twice is fine.
    pub fn cancel(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    /// Drops every callback. Idempotent.
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Runs one frame: clamps `raw_dt` to the per-frame cap and invokes every
    /// live callback with the same tick.
    pub fn run_frame(&mut self, now: Duration, raw_dt: f32) {
        let dt = raw_dt.clamp(0.0, MAX_FRAME_DT);
        if dt < raw_dt {
            debug!(raw_dt, dt, "frame_delta_clamped");
        }
        let tick = FrameTick { now, dt };
        for (_, callback) in &mut self.callbacks {
            callback(tick);
        }
    }
}

/// Fires at most once per call when `interval` has elapsed since the last
/// fire. The first call arms the timer without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    last_fired: Option<Duration>,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn fire_due(&mut self, now: Duration) -> bool {
        match self.last_fired {
            None => {
                self.last_fired = Some(now);
                false
            }
            Some(last) if now.saturating_sub(last) >= self.interval => {
                self.last_fired = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}
