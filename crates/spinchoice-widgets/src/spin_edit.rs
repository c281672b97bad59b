#![forbid(unsafe_code)]

//! Bounded numeric spin field.
//!
//! A [`SpinEdit`] holds one integer inside an inclusive `[min, max]` range,
//! the text that represents it, and the enablement of its raise and lower
//! buttons. Input arrives as discrete signals: raise, lower, an edited text,
//! or a refresh of the display.
//!
//! # Example
//!
//! ```
//! use spinchoice_widgets::spin_edit::SpinEdit;
//!
//! let mut hours = SpinEdit::new().with_range(0, 23).with_value(22);
//! assert!(hours.raise());
//! assert_eq!(hours.text(), "23");
//! assert!(!hours.raise()); // at max
//!
//! hours.edit("7");
//! assert_eq!(hours.value(), 7);
//! hours.refresh();
//! assert_eq!(hours.text(), "07");
//! ```
//!
//! # Invariants
//!
//! 1. `min <= max` always. Moving one bound past the other drags the other
//!    bound along.
//! 2. After `set_min`/`set_max`, `min <= value <= max`. `set_value` itself
//!    does not clamp; callers clamp first.
//! 3. `buttons()` contains `RAISE` iff `value < max` and `LOWER` iff
//!    `value > min`, after every operation.
//! 4. `version()` increments exactly once per operation that changes the
//!    committed value.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Unparseable text | Parsed as `0`, then clamped |
//! | More digits than `ems` | Treated as `max`, display refreshed |
//! | Out-of-range value | Clamped to the nearest bound |
//! | Listener veto | Value unchanged, display reverted |

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use spinchoice_runtime::{RepeatDirection, Repeater};
use web_time::{Duration, Instant};

use crate::converter::{PaddedConverter, ValueConverter, digit_count};
use crate::listener::ValueChangeListener;
use crate::stateful::{StateKey, Stateful};

/// Default digit width.
pub const DEFAULT_EMS: u32 = 2;

bitflags! {
    /// Which step buttons are enabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpinButtons: u8 {
        /// The value can go up.
        const RAISE = 0b01;
        /// The value can go down.
        const LOWER = 0b10;
    }
}

/// Result of [`SpinEdit::edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The (clamped) value was committed.
    Committed {
        /// The committed value.
        value: i32,
        /// Whether the display was rewritten from the value rather than
        /// left as typed.
        refreshed: bool,
    },
    /// A listener refused the change; the display shows the old value.
    Vetoed,
}

impl EditOutcome {
    /// Whether the edit was committed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// A discrete input signal for a spin field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinSignal<'a> {
    /// Raise button click or up key.
    Raise,
    /// Lower button click or down key.
    Lower,
    /// Enter key or focus change: redraw the committed value.
    Refresh,
    /// The text box content changed.
    Edit(&'a str),
}

/// Largest value that fits in `ems` decimal digits.
#[must_use]
pub fn max_for_ems(ems: u32) -> i32 {
    10_i32.checked_pow(ems).map_or(i32::MAX, |limit| limit - 1)
}

/// Bounded integer field with an editable text form.
pub struct SpinEdit {
    id: String,
    value: i32,
    min: i32,
    max: i32,
    ems: u32,
    text: String,
    buttons: SpinButtons,
    converter: Rc<dyn ValueConverter>,
    listener: Option<Rc<dyn ValueChangeListener>>,
    repeater: Repeater,
    version: u64,
}

impl Default for SpinEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpinEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinEdit")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("ems", &self.ems)
            .field("text", &self.text)
            .field("buttons", &self.buttons)
            .field("has_listener", &self.listener.is_some())
            .field("repeater", &self.repeater)
            .finish()
    }
}

impl SpinEdit {
    /// Field with value and min `0`, max `99`, and zero-padded text.
    #[must_use]
    pub fn new() -> Self {
        let mut field = Self {
            id: "spin-edit".to_owned(),
            value: 0,
            min: 0,
            max: max_for_ems(DEFAULT_EMS),
            ems: DEFAULT_EMS,
            text: String::new(),
            buttons: SpinButtons::empty(),
            converter: Rc::new(PaddedConverter),
            listener: None,
            repeater: Repeater::new(),
            version: 0,
        };
        field.set_value(0);
        field
    }

    /// Set the instance id used for persistence keys.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the digit width. Does not change the range.
    #[must_use]
    pub fn with_ems(mut self, ems: u32) -> Self {
        self.set_ems(ems);
        self
    }

    /// Set both bounds (max first, then min).
    #[must_use]
    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.set_max(max);
        self.set_min(min);
        self
    }

    /// Set the value without clamping.
    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.set_value(value);
        self
    }

    /// Set the value converter.
    #[must_use]
    pub fn with_converter(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.set_converter(Rc::new(converter));
        self
    }

    /// Attach a change listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Rc<dyn ValueChangeListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Set the press-and-hold repeat delay.
    #[must_use]
    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.repeater.set_delay(delay);
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Instance id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Committed value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Digit width.
    #[must_use]
    pub const fn ems(&self) -> u32 {
        self.ems
    }

    /// Text currently displayed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Enabled step buttons.
    #[must_use]
    pub const fn buttons(&self) -> SpinButtons {
        self.buttons
    }

    /// Whether the raise button is enabled.
    #[must_use]
    pub fn can_raise(&self) -> bool {
        self.buttons.contains(SpinButtons::RAISE)
    }

    /// Whether the lower button is enabled.
    #[must_use]
    pub fn can_lower(&self) -> bool {
        self.buttons.contains(SpinButtons::LOWER)
    }

    /// Change counter of the committed value.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The converter in use.
    #[must_use]
    pub fn converter(&self) -> &Rc<dyn ValueConverter> {
        &self.converter
    }

    /// Whether a listener is attached.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Press-and-hold state.
    #[must_use]
    pub const fn repeater(&self) -> &Repeater {
        &self.repeater
    }

    // ── Programmatic setters (no notifications) ─────────────────────

    /// Store `value` as is, redraw the text and update the buttons.
    pub fn set_value(&mut self, value: i32) {
        if value != self.value {
            self.version += 1;
        }
        self.value = value;
        self.refresh();
        self.update_buttons();
    }

    /// Set the lower bound, clamping the value and raising `max` if needed.
    pub fn set_min(&mut self, min: i32) {
        self.min = min;
        if self.value < min {
            self.set_value(min);
        }
        if self.max < min {
            self.max = min;
        }
        self.update_buttons();
    }

    /// Set the upper bound, clamping the value and lowering `min` if needed.
    pub fn set_max(&mut self, max: i32) {
        self.max = max;
        if self.value > max {
            self.set_value(max);
        }
        if self.min > max {
            self.min = max;
        }
        self.update_buttons();
    }

    /// Set the digit width. Does not change the range.
    pub fn set_ems(&mut self, ems: u32) {
        self.ems = ems;
    }

    /// Swap the converter and redraw the text.
    pub fn set_converter(&mut self, converter: Rc<dyn ValueConverter>) {
        self.converter = converter;
        self.refresh();
    }

    /// Attach a change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: Rc<dyn ValueChangeListener>) {
        self.listener = Some(listener);
    }

    /// Detach the change listener.
    pub fn clear_listener(&mut self) -> Option<Rc<dyn ValueChangeListener>> {
        self.listener.take()
    }

    /// Change the press-and-hold delay.
    pub fn set_repeat_delay(&mut self, delay: Duration) {
        self.repeater.set_delay(delay);
    }

    /// Redraw the text from the committed value.
    pub fn refresh(&mut self) {
        self.text = self.converter.format(self.value);
    }

    // ── User input ──────────────────────────────────────────────────

    /// Apply a discrete input signal. Returns whether the value changed.
    pub fn handle(&mut self, signal: SpinSignal<'_>) -> bool {
        let before = self.version;
        match signal {
            SpinSignal::Raise => {
                self.raise();
            }
            SpinSignal::Lower => {
                self.lower();
            }
            SpinSignal::Refresh => self.refresh(),
            SpinSignal::Edit(text) => {
                self.edit(text);
            }
        }
        self.version != before
    }

    /// The user typed `text` into the field.
    ///
    /// The parsed value is clamped, offered to the listener, and committed
    /// or reverted. When committed without a forced refresh the typed text
    /// stays on display.
    pub fn edit(&mut self, text: &str) -> EditOutcome {
        text.clone_into(&mut self.text);

        let parsed = self.converter.parse(text);
        let mut candidate = parsed;
        let mut refresh = false;

        if digit_count(parsed) > self.ems {
            candidate = self.max;
            refresh = true;
        }
        candidate = self.clamp(candidate);

        let listener = self.listener.clone();
        let approved = match &listener {
            Some(listener) if candidate != self.value => listener.on_changing(self, candidate),
            _ => true,
        };

        if !approved {
            #[cfg(feature = "tracing")]
            tracing::trace!(field = %self.id, candidate, "edit vetoed");
            self.refresh();
            self.update_buttons();
            return EditOutcome::Vetoed;
        }

        if refresh {
            self.set_value(candidate);
        } else {
            if candidate != self.value {
                self.version += 1;
            }
            self.value = candidate;
        }

        if let Some(listener) = &listener {
            listener.on_changed(self);
        }
        self.update_buttons();

        #[cfg(feature = "tracing")]
        tracing::trace!(field = %self.id, value = candidate, refreshed = refresh, "edit committed");

        EditOutcome::Committed {
            value: candidate,
            refreshed: refresh,
        }
    }

    /// Step the value up by one. Returns whether it changed.
    pub fn raise(&mut self) -> bool {
        self.step(RepeatDirection::Raise)
    }

    /// Step the value down by one. Returns whether it changed.
    pub fn lower(&mut self) -> bool {
        self.step(RepeatDirection::Lower)
    }

    /// Step once in `direction`. Returns whether the value changed.
    ///
    /// The listener is told about the button first, then asked to approve
    /// the unclamped candidate.
    pub fn step(&mut self, direction: RepeatDirection) -> bool {
        let candidate = match direction {
            RepeatDirection::Raise => self.value.saturating_add(1),
            RepeatDirection::Lower => self.value.saturating_sub(1),
        };

        let listener = self.listener.clone();
        let mut approved = true;
        if let Some(listener) = &listener {
            match direction {
                RepeatDirection::Raise => listener.on_raising(self),
                RepeatDirection::Lower => listener.on_lowering(self),
            }
            approved = listener.on_changing(self, candidate);
        }

        let candidate = self.clamp(candidate);
        if !approved || candidate == self.value {
            return false;
        }

        self.set_value(candidate);
        if let Some(listener) = &listener {
            listener.on_changed(self);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(field = %self.id, ?direction, value = candidate, "step committed");
        true
    }

    // ── Press and hold ──────────────────────────────────────────────

    /// A step button was pressed and held. Steps immediately and returns
    /// whether another step is scheduled.
    pub fn press(&mut self, direction: RepeatDirection, now: Instant) -> bool {
        self.repeater.start(direction, now);
        self.poll_repeat(now)
    }

    /// A held step button was released. Idempotent.
    pub fn release(&mut self, direction: RepeatDirection) {
        self.repeater.stop(direction);
    }

    /// Release both step buttons.
    pub fn release_all(&mut self) {
        self.repeater.stop_all();
    }

    /// Run a due repeat step. Returns whether another step is scheduled.
    pub fn poll_repeat(&mut self, now: Instant) -> bool {
        let mut repeater = self.repeater;
        let rescheduled = repeater.poll(now, |direction| self.step(direction));
        self.repeater = repeater;
        rescheduled
    }

    /// When the next repeat step is due.
    #[must_use]
    pub const fn next_repeat_at(&self) -> Option<Instant> {
        self.repeater.next_deadline()
    }

    /// Whether a step button is held.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.repeater.is_active()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn clamp(&self, candidate: i32) -> i32 {
        candidate.min(self.max).max(self.min)
    }

    fn update_buttons(&mut self) {
        self.buttons.set(SpinButtons::RAISE, self.value < self.max);
        self.buttons.set(SpinButtons::LOWER, self.value > self.min);
    }
}

// ── Persistence ─────────────────────────────────────────────────────

/// Persisted state of a [`SpinEdit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SpinEditState {
    /// Committed value.
    pub value: i32,
}

impl Stateful for SpinEdit {
    type State = SpinEditState;

    fn state_key(&self) -> StateKey {
        StateKey::new("SpinEdit", &self.id)
    }

    fn save_state(&self) -> SpinEditState {
        SpinEditState { value: self.value }
    }

    fn restore_state(&mut self, state: SpinEditState) {
        let value = self.clamp(state.value);
        self.set_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    // ── Test listeners ──────────────────────────────────────────────

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
        veto: Cell<bool>,
    }

    impl Recorder {
        fn vetoing() -> Self {
            let recorder = Self::default();
            recorder.veto.set(true);
            recorder
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl ValueChangeListener for Recorder {
        fn on_changing(&self, source: &SpinEdit, candidate: i32) -> bool {
            self.events
                .borrow_mut()
                .push(format!("changing {}->{candidate}", source.value()));
            !self.veto.get()
        }

        fn on_changed(&self, source: &SpinEdit) {
            self.events
                .borrow_mut()
                .push(format!("changed {}", source.value()));
        }

        fn on_raising(&self, _source: &SpinEdit) {
            self.events.borrow_mut().push("raising".into());
        }

        fn on_lowering(&self, _source: &SpinEdit) {
            self.events.borrow_mut().push("lowering".into());
        }
    }

    fn field(min: i32, max: i32, value: i32) -> SpinEdit {
        SpinEdit::new().with_range(min, max).with_value(value)
    }

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn new_field_defaults() {
        let f = SpinEdit::new();
        assert_eq!(f.value(), 0);
        assert_eq!(f.min(), 0);
        assert_eq!(f.max(), 99);
        assert_eq!(f.ems(), 2);
        assert_eq!(f.text(), "00");
        assert_eq!(f.buttons(), SpinButtons::RAISE);
    }

    #[test]
    fn max_for_ems_values() {
        assert_eq!(max_for_ems(1), 9);
        assert_eq!(max_for_ems(2), 99);
        assert_eq!(max_for_ems(4), 9999);
        assert_eq!(max_for_ems(12), i32::MAX);
    }

    #[test]
    fn with_ems_keeps_range() {
        let f = SpinEdit::new().with_ems(4);
        assert_eq!(f.ems(), 4);
        assert_eq!(f.max(), 99);
    }

    // ── set_value / bounds ──────────────────────────────────────────

    #[test]
    fn set_value_is_unclamped_and_idempotent() {
        let mut f = field(0, 10, 5);
        f.set_value(42);
        assert_eq!(f.value(), 42);
        assert_eq!(f.text(), "42");
        assert!(!f.can_raise());
        assert!(f.can_lower());

        let version = f.version();
        let text = f.text().to_owned();
        f.set_value(42);
        assert_eq!(f.version(), version);
        assert_eq!(f.text(), text);
        assert_eq!(f.buttons(), SpinButtons::LOWER);
    }

    #[test]
    fn set_value_does_not_notify() {
        let recorder = Rc::new(Recorder::default());
        let mut f = field(0, 10, 5).with_listener(recorder.clone());
        f.set_value(7);
        f.set_min(8);
        f.set_max(9);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn set_min_clamps_value() {
        let mut f = field(0, 20, 3);
        f.set_min(5);
        assert_eq!(f.value(), 5);
        assert_eq!(f.text(), "05");
        assert!(!f.can_lower());
    }

    #[test]
    fn set_max_clamps_value() {
        let mut f = field(0, 20, 15);
        f.set_max(12);
        assert_eq!(f.value(), 12);
        assert!(!f.can_raise());
        assert!(f.can_lower());
    }

    #[test]
    fn crossing_min_raises_max() {
        let mut f = field(0, 10, 5);
        f.set_min(15);
        assert_eq!((f.min(), f.max(), f.value()), (15, 15, 15));
        assert!(f.buttons().is_empty());
    }

    #[test]
    fn crossing_max_lowers_min() {
        let mut f = field(5, 10, 7);
        f.set_max(2);
        assert_eq!((f.min(), f.max(), f.value()), (2, 2, 2));
    }

    #[test]
    fn buttons_track_bounds() {
        let mut f = field(0, 3, 0);
        assert_eq!(f.buttons(), SpinButtons::RAISE);
        f.raise();
        assert_eq!(f.buttons(), SpinButtons::RAISE | SpinButtons::LOWER);
        f.set_value(3);
        assert_eq!(f.buttons(), SpinButtons::LOWER);
    }

    // ── raise / lower ───────────────────────────────────────────────

    #[test]
    fn raise_and_lower_step_by_one() {
        let mut f = field(0, 10, 5);
        assert!(f.raise());
        assert_eq!(f.value(), 6);
        assert_eq!(f.text(), "06");
        assert!(f.lower());
        assert!(f.lower());
        assert_eq!(f.value(), 4);
    }

    #[test]
    fn raise_at_max_reports_unchanged() {
        let mut f = field(0, 3, 3);
        let version = f.version();
        assert!(!f.raise());
        assert_eq!(f.value(), 3);
        assert_eq!(f.version(), version);
    }

    #[test]
    fn lower_at_min_reports_unchanged() {
        let mut f = field(2, 3, 2);
        assert!(!f.lower());
        assert_eq!(f.value(), 2);
    }

    #[test]
    fn raise_below_min_clamps_into_range() {
        let mut f = field(5, 10, 5);
        f.set_value(0);
        assert!(f.raise());
        assert_eq!(f.value(), 5);
    }

    #[test]
    fn raise_notifies_in_order() {
        let recorder = Rc::new(Recorder::default());
        let mut f = field(0, 10, 5).with_listener(recorder.clone());
        assert!(f.raise());
        assert_eq!(
            recorder.events(),
            vec!["raising", "changing 5->6", "changed 6"]
        );
    }

    #[test]
    fn lower_at_bound_still_asks_listener() {
        let recorder = Rc::new(Recorder::default());
        let mut f = field(0, 10, 0).with_listener(recorder.clone());
        assert!(!f.lower());
        assert_eq!(recorder.events(), vec!["lowering", "changing 0->-1"]);
    }

    #[test]
    fn vetoed_step_changes_nothing() {
        let recorder = Rc::new(Recorder::vetoing());
        let mut f = field(0, 10, 5).with_listener(recorder.clone());
        assert!(!f.raise());
        assert!(!f.lower());
        assert_eq!(f.value(), 5);
        assert_eq!(f.text(), "05");
        assert!(!recorder.events().iter().any(|e| e.starts_with("changed")));
    }

    // ── edit ────────────────────────────────────────────────────────

    #[test]
    fn edit_commits_and_keeps_typed_text() {
        let mut f = field(0, 59, 0);
        let outcome = f.edit("7");
        assert_eq!(
            outcome,
            EditOutcome::Committed {
                value: 7,
                refreshed: false
            }
        );
        assert_eq!(f.value(), 7);
        assert_eq!(f.text(), "7");
        f.refresh();
        assert_eq!(f.text(), "07");
    }

    #[test]
    fn edit_clamps_into_range() {
        let mut f = field(10, 50, 20);
        f.edit("5");
        assert_eq!(f.value(), 10);
        f.edit("75");
        assert_eq!(f.value(), 50);
        assert!(!f.can_raise());
    }

    #[test]
    fn edit_garbage_parses_as_zero_then_clamps() {
        let mut f = field(1, 31, 15);
        f.edit("xyz");
        assert_eq!(f.value(), 1);
        let mut g = field(0, 31, 15);
        g.edit("");
        assert_eq!(g.value(), 0);
    }

    #[test]
    fn edit_too_many_digits_forces_max_and_refresh() {
        let mut f = field(0, 59, 12);
        let outcome = f.edit("123");
        assert_eq!(
            outcome,
            EditOutcome::Committed {
                value: 59,
                refreshed: true
            }
        );
        assert_eq!(f.text(), "59");
    }

    #[test]
    fn edit_vetoed_reverts_display() {
        let recorder = Rc::new(Recorder::vetoing());
        let mut f = field(0, 59, 12).with_listener(recorder.clone());
        assert_eq!(f.edit("30"), EditOutcome::Vetoed);
        assert_eq!(f.value(), 12);
        assert_eq!(f.text(), "12");
        assert_eq!(recorder.events(), vec!["changing 12->30"]);
    }

    #[test]
    fn edit_to_same_value_skips_veto_but_notifies() {
        let recorder = Rc::new(Recorder::vetoing());
        let mut f = field(0, 59, 12).with_listener(recorder.clone());
        assert!(f.edit("12").is_committed());
        assert_eq!(recorder.events(), vec!["changed 12"]);
    }

    #[test]
    fn edit_bumps_version_only_on_change() {
        let mut f = field(0, 59, 12);
        let v0 = f.version();
        f.edit("12");
        assert_eq!(f.version(), v0);
        f.edit("13");
        assert_eq!(f.version(), v0 + 1);
    }

    // ── converter / signals ─────────────────────────────────────────

    #[test]
    fn swapping_converter_redraws() {
        struct Hex;
        impl ValueConverter for Hex {
            fn format(&self, value: i32) -> String {
                format!("{value:x}")
            }
            fn parse(&self, text: &str) -> i32 {
                i32::from_str_radix(text, 16).unwrap_or(0)
            }
        }

        let mut f = field(0, 255, 11);
        assert_eq!(f.text(), "11");
        f.set_converter(Rc::new(Hex));
        assert_eq!(f.text(), "b");
        f.edit("1f");
        assert_eq!(f.value(), 31);
    }

    #[test]
    fn handle_signals() {
        let mut f = field(0, 10, 5);
        assert!(f.handle(SpinSignal::Raise));
        assert!(f.handle(SpinSignal::Lower));
        assert!(f.handle(SpinSignal::Edit("9")));
        assert_eq!(f.text(), "9");
        assert!(!f.handle(SpinSignal::Refresh));
        assert_eq!(f.text(), "09");
        assert!(!f.handle(SpinSignal::Edit("09")));
    }

    // ── press and hold ──────────────────────────────────────────────

    #[test]
    fn press_lower_at_min_schedules_nothing() {
        let now = Instant::now();
        let mut f = field(0, 3, 0);
        assert!(!f.press(RepeatDirection::Lower, now));
        assert_eq!(f.next_repeat_at(), None);
        assert!(!f.is_repeating());
    }

    #[test]
    fn press_raise_commits_at_most_headroom() {
        let start = Instant::now();
        let mut f = field(0, 3, 0);
        let mut commits = 0;
        let before = f.version();

        f.press(RepeatDirection::Raise, start);
        while let Some(at) = f.next_repeat_at() {
            f.poll_repeat(at);
            commits += 1;
            assert!(commits < 10);
        }
        assert_eq!(f.value(), 3);
        assert_eq!(f.version() - before, 3);
    }

    #[test]
    fn release_stops_repeating() {
        let now = Instant::now();
        let mut f = field(0, 50, 0);
        assert!(f.press(RepeatDirection::Raise, now));
        assert_eq!(f.value(), 1);
        f.release(RepeatDirection::Raise);
        f.release(RepeatDirection::Raise);
        assert!(!f.poll_repeat(now + Duration::from_secs(1)));
        assert_eq!(f.value(), 1);
    }

    #[test]
    fn repeat_respects_delay() {
        let now = Instant::now();
        let delay = Duration::from_millis(50);
        let mut f = field(0, 50, 0).with_repeat_delay(delay);
        f.press(RepeatDirection::Raise, now);
        assert!(!f.poll_repeat(now + Duration::from_millis(10)));
        assert_eq!(f.value(), 1);
        assert!(f.poll_repeat(now + delay));
        assert_eq!(f.value(), 2);
    }

    #[test]
    fn veto_stops_repeat() {
        let now = Instant::now();
        let recorder = Rc::new(Recorder::vetoing());
        let mut f = field(0, 50, 10).with_listener(recorder);
        assert!(!f.press(RepeatDirection::Raise, now));
        assert_eq!(f.value(), 10);
        assert!(!f.is_repeating());
    }

    // ── persistence ─────────────────────────────────────────────────

    #[test]
    fn save_restore_round_trip() {
        let mut f = field(0, 59, 42).with_id("minutes");
        assert_eq!(f.state_key(), StateKey::new("SpinEdit", "minutes"));
        let saved = f.save_state();
        f.set_value(0);
        f.restore_state(saved);
        assert_eq!(f.value(), 42);
        assert_eq!(f.text(), "42");
    }

    #[test]
    fn restore_clamps_to_range() {
        let mut f = field(0, 23, 5);
        f.restore_state(SpinEditState { value: 99 });
        assert_eq!(f.value(), 23);
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn state_serializes_as_json() {
        let state = SpinEditState { value: 17 };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"value":17}"#);
        let back: SpinEditState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    // ── properties ──────────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Raise,
            Lower,
            Edit(String),
            SetMin(i32),
            SetMax(i32),
            Refresh,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Raise),
                Just(Op::Lower),
                "[0-9a-z-]{0,4}".prop_map(Op::Edit),
                (-50i32..150).prop_map(Op::SetMin),
                (-50i32..150).prop_map(Op::SetMax),
                Just(Op::Refresh),
            ]
        }

        proptest! {
            #[test]
            fn clamp_closure(ops in prop::collection::vec(op(), 0..40)) {
                let mut f = SpinEdit::new();
                for op in ops {
                    match op {
                        Op::Raise => { f.raise(); }
                        Op::Lower => { f.lower(); }
                        Op::Edit(text) => { f.edit(&text); }
                        Op::SetMin(m) => f.set_min(m),
                        Op::SetMax(m) => f.set_max(m),
                        Op::Refresh => f.refresh(),
                    }
                    prop_assert!(f.min() <= f.max());
                    prop_assert!(f.min() <= f.value() && f.value() <= f.max());
                    prop_assert_eq!(f.can_raise(), f.value() < f.max());
                    prop_assert_eq!(f.can_lower(), f.value() > f.min());
                }
            }

            #[test]
            fn set_value_idempotent(start in -100i32..100, v in -100i32..100) {
                let mut once = field(-100, 100, start);
                once.set_value(v);
                let mut twice = field(-100, 100, start);
                twice.set_value(v);
                twice.set_value(v);
                prop_assert_eq!(once.value(), twice.value());
                prop_assert_eq!(once.text(), twice.text());
                prop_assert_eq!(once.buttons(), twice.buttons());
                prop_assert_eq!(once.version(), twice.version());
            }
        }
    }
}
