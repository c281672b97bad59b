#![forbid(unsafe_code)]

//! Press-and-hold repeat timer.
//!
//! A [`Repeater`] turns "button held down" into a series of raise or lower
//! steps spaced `delay` apart. It owns no clock and no thread: the host
//! passes the current [`Instant`] to [`Repeater::poll`] from the same event
//! loop that delivers every other input, and the repeater calls back into
//! the stepping closure when a tick is due.
//!
//! # Protocol
//!
//! 1. [`start`](Repeater::start) arms a direction and schedules a tick at
//!    `now`, so the first step happens on the next poll.
//! 2. A tick steps every armed direction once. A direction whose step
//!    reports "not changed" (the value hit its bound, or the change was
//!    vetoed) disarms itself.
//! 3. The next tick is scheduled at `now + delay` only if at least one step
//!    changed the value.
//! 4. [`stop`](Repeater::stop) disarms a direction and is idempotent. When
//!    no direction stays armed the pending tick is dropped, so a stop always
//!    lands before the next tick fires.
//!
//! Raise and lower are tracked independently; both may be armed at once,
//! in which case a tick raises first, then lowers.

use web_time::{Duration, Instant};

/// Delay between repeated steps while a button is held.
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(100);

/// Which way a held button steps the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatDirection {
    /// Increment by one per tick.
    Raise,
    /// Decrement by one per tick.
    Lower,
}

impl RepeatDirection {
    /// Both directions, in tick order.
    pub const ALL: [Self; 2] = [Self::Raise, Self::Lower];
}

/// Cooperative repeat timer state.
///
/// `Repeater` is `Copy`: it is a handful of flags and instants, so owners
/// can copy it out, fire it against themselves, and store it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeater {
    raising: bool,
    lowering: bool,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Repeater {
    fn default() -> Self {
        Self::new()
    }
}

impl Repeater {
    /// Idle repeater with [`DEFAULT_REPEAT_DELAY`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raising: false,
            lowering: false,
            delay: DEFAULT_REPEAT_DELAY,
            deadline: None,
        }
    }

    /// Set the delay between ticks.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay between ticks.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. Takes effect from the next reschedule.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Whether `direction` is armed.
    #[must_use]
    pub const fn is_armed(&self, direction: RepeatDirection) -> bool {
        match direction {
            RepeatDirection::Raise => self.raising,
            RepeatDirection::Lower => self.lowering,
        }
    }

    /// Whether any direction is armed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.raising || self.lowering
    }

    /// When the next tick is due, if one is scheduled.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a tick is scheduled at or before `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Arm `direction` and schedule a tick at `now`.
    pub fn start(&mut self, direction: RepeatDirection, now: Instant) {
        self.set_armed(direction, true);
        self.deadline = Some(match self.deadline {
            Some(pending) if pending <= now => pending,
            _ => now,
        });
        tracing::trace!(?direction, "repeat started");
    }

    /// Disarm `direction`. Calling it again is a no-op.
    pub fn stop(&mut self, direction: RepeatDirection) {
        if !self.is_armed(direction) {
            return;
        }
        self.set_armed(direction, false);
        if !self.is_active() {
            self.deadline = None;
        }
        tracing::trace!(?direction, "repeat stopped");
    }

    /// Disarm both directions and drop any pending tick.
    pub fn stop_all(&mut self) {
        self.raising = false;
        self.lowering = false;
        self.deadline = None;
    }

    /// Run one tick if it is due. Returns whether another tick was scheduled.
    pub fn poll(&mut self, now: Instant, step: impl FnMut(RepeatDirection) -> bool) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.fire(now, step)
    }

    /// Run one tick immediately.
    ///
    /// `step` is called once per armed direction and must return whether it
    /// changed the value. Returns whether another tick was scheduled.
    pub fn fire(&mut self, now: Instant, mut step: impl FnMut(RepeatDirection) -> bool) -> bool {
        self.deadline = None;
        let mut reschedule = false;

        for direction in RepeatDirection::ALL {
            if !self.is_armed(direction) {
                continue;
            }
            if step(direction) {
                reschedule = true;
            } else {
                self.set_armed(direction, false);
                tracing::trace!(?direction, "repeat reached bound");
            }
        }

        if reschedule {
            self.deadline = Some(now + self.delay);
        }
        reschedule
    }

    fn set_armed(&mut self, direction: RepeatDirection, armed: bool) {
        match direction {
            RepeatDirection::Raise => self.raising = armed,
            RepeatDirection::Lower => self.lowering = armed,
        }
    }
}
