//! Opt-in trait for widgets with persistable state.
//!
//! A host that tears widgets down and rebuilds them (screen rotation,
//! process restart) saves each widget's user-facing state through
//! [`Stateful`] and restores it into the fresh instance.
//!
//! # Design Invariants
//!
//! 1. **Round-trip fidelity**: `restore_state(save_state())` yields the same
//!    committed values. Derived state (bounds, button enablement, display
//!    text) is recomputed, not stored.
//!
//! 2. **Restored values are clamped**: stored data is not trusted; a spin
//!    field clamps into its current range and a date/time choice re-runs its
//!    bound cascade.
//!
//! 3. **Graceful version mismatch**: when [`VersionedState`] detects a
//!    version mismatch, callers fall back to `State::default()`.
//!
//! 4. **No side effects**: `save_state` is a pure read; `restore_state` only
//!    mutates `self` and fires no change listeners.
//!
//! # Feature Gate
//!
//! The serde derives on state types and on [`VersionedState`] require the
//! `state-persistence` feature.

use core::fmt;

/// Unique identifier for a widget's persisted state: `(widget_type, instance_id)`.
///
/// ```
/// # use spinchoice_widgets::stateful::StateKey;
/// let key = StateKey::new("SpinEdit", "alarm/hour");
/// assert_eq!(key.canonical(), "SpinEdit::alarm/hour");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateKey {
    /// The widget type name (`"SpinEdit"`, `"DateTimeChoice"`).
    pub widget_type: &'static str,
    /// Instance-unique identifier.
    pub instance_id: String,
}

impl StateKey {
    /// Create a new state key from a widget type and instance id.
    #[must_use]
    pub fn new(widget_type: &'static str, id: impl Into<String>) -> Self {
        Self {
            widget_type,
            instance_id: id.into(),
        }
    }

    /// Canonical string representation: `"widget_type::instance_id"`.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.widget_type, self.instance_id)
    }
}

/// Save/restore contract for widget state.
pub trait Stateful: Sized {
    /// The state type that gets persisted.
    ///
    /// Must implement `Default` so missing or stale state degrades gracefully.
    type State: Default;

    /// Unique key identifying this widget instance.
    fn state_key(&self) -> StateKey;

    /// Extract current state. Pure read.
    fn save_state(&self) -> Self::State;

    /// Restore state, clamping to what the widget currently allows.
    fn restore_state(&mut self, state: Self::State);

    /// State schema version. Bump when `State` changes incompatibly.
    fn state_version() -> u32 {
        1
    }
}

/// Version-tagged wrapper for serialized widget state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VersionedState<S> {
    /// Schema version (from `Stateful::state_version()`).
    pub version: u32,
    /// The actual state payload.
    pub data: S,
}

impl<S> VersionedState<S> {
    /// Pack a widget's state into a versioned envelope.
    pub fn pack<W: Stateful<State = S>>(widget: &W) -> Self {
        Self {
            version: W::state_version(),
            data: widget.save_state(),
        }
    }

    /// Unpack, returning `None` on version mismatch.
    pub fn unpack<W: Stateful<State = S>>(self) -> Option<S> {
        (self.version == W::state_version()).then_some(self.data)
    }

    /// Unpack, falling back to `S::default()` on version mismatch.
    pub fn unpack_or_default<W: Stateful<State = S>>(self) -> S
    where
        S: Default,
    {
        self.unpack::<W>().unwrap_or_default()
    }

    /// Unpack straight into `widget`. Returns whether the state was applied.
    pub fn restore_into<W: Stateful<State = S>>(self, widget: &mut W) -> bool {
        match self.unpack::<W>() {
            Some(state) => {
                widget.restore_state(state);
                true
            }
            None => false,
        }
    }
}
