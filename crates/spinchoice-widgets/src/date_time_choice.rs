#![forbid(unsafe_code)]

//! Five-field date/time choice with cascading bounds.
//!
//! A [`DateTimeChoice`] owns one [`SpinEdit`] per [`DateTimeField`] and keeps
//! every field's range consistent with the overall `[min_value, max_value]`
//! after each committed change. The per-field ranges come from
//! [`cascade_bounds`]; see the [`date_time`](crate::date_time) module for how
//! the cascade tightens.
//!
//! # Example
//!
//! ```
//! use spinchoice_widgets::date_time::{DateTimeField, DateTimeValue};
//! use spinchoice_widgets::date_time_choice::DateTimeChoice;
//!
//! let mut choice = DateTimeChoice::new();
//! choice.set_value(DateTimeValue::new(2024, 1, 31, 12, 0));
//! choice.raise(DateTimeField::Month);
//! // February 2024 has 29 days; the day was clamped.
//! assert_eq!(choice.value(), DateTimeValue::new(2024, 2, 29, 12, 0));
//! ```
//!
//! # Invariants
//!
//! 1. After every public operation, each field's `[min, max]` is the range
//!    [`cascade_bounds`] computes for the current value, and every field
//!    value lies inside its range.
//! 2. Changes made through [`DateTimeChoice::field_mut`] are picked up when
//!    the guard drops; the composite recomputes only if the field's value
//!    actually changed.
//! 3. The consumer listener is held weakly. Dropping it silently detaches
//!    it.
//!
//! # Failure Modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | `set_value` outside the bounds | Fields clamped by the cascade |
//! | Day past the end of the month | Clamped to the month's last day |
//! | `min_value > max_value` | Field ranges collapse; no panic |
//! | Listener dropped | Treated as absent |

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::{Rc, Weak};

use spinchoice_i18n::MonthNames;
use spinchoice_runtime::RepeatDirection;
use web_time::{Duration, Instant};

use crate::converter::{MonthNameConverter, PaddedConverter};
use crate::date_time::{DateTimeField, DateTimeValue, FieldBounds, cascade_bounds};
use crate::listener::ValueChangeListener;
use crate::spin_edit::{EditOutcome, SpinEdit};
use crate::stateful::{StateKey, Stateful};

/// Observer and gatekeeper for a whole [`DateTimeChoice`].
///
/// Per-field proposals and button notifications are relayed with the field
/// they came from. [`on_changed`](Self::on_changed) fires once per committed
/// change, after the bounds were recomputed.
pub trait DateTimeChangeListener {
    /// `field` is about to change to `candidate`. Return `false` to veto.
    fn on_changing(&self, _field: DateTimeField, _candidate: i32) -> bool {
        true
    }

    /// A change was committed and the bounds recomputed.
    fn on_changed(&self, _value: DateTimeValue) {}

    /// The raise button of `field` was activated.
    fn on_raising(&self, _field: DateTimeField) {}

    /// The lower button of `field` was activated.
    fn on_lowering(&self, _field: DateTimeField) {}
}

/// Forwards one field's notifications to the consumer listener.
struct FieldRelay {
    field: DateTimeField,
    target: Weak<dyn DateTimeChangeListener>,
}

impl ValueChangeListener for FieldRelay {
    fn on_changing(&self, _source: &SpinEdit, candidate: i32) -> bool {
        self.target
            .upgrade()
            .is_none_or(|target| target.on_changing(self.field, candidate))
    }

    fn on_raising(&self, _source: &SpinEdit) {
        if let Some(target) = self.target.upgrade() {
            target.on_raising(self.field);
        }
    }

    fn on_lowering(&self, _source: &SpinEdit) {
        if let Some(target) = self.target.upgrade() {
            target.on_lowering(self.field);
        }
    }
}

/// Date/time input composed of five bounded fields.
pub struct DateTimeChoice {
    id: String,
    fields: [SpinEdit; 5],
    min_value: Option<DateTimeValue>,
    max_value: Option<DateTimeValue>,
    listener: Option<Weak<dyn DateTimeChangeListener>>,
}

impl Default for DateTimeChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DateTimeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeChoice")
            .field("id", &self.id)
            .field("value", &self.value())
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("has_listener", &self.has_listener())
            .finish()
    }
}

impl DateTimeChoice {
    /// Choice at `1970-01-01T00:00` with the default bounds.
    #[must_use]
    pub fn new() -> Self {
        let id = "date-time-choice".to_owned();
        let mut choice = Self {
            fields: DateTimeField::ALL.map(|field| {
                SpinEdit::new()
                    .with_ems(field.ems())
                    .with_id(format!("{id}/{field}"))
            }),
            id,
            min_value: None,
            max_value: None,
            listener: None,
        };
        choice.set_value(DateTimeValue::DEFAULT_MIN);
        choice
    }

    /// Set the instance id. Field ids become `"{id}/{field}"`.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        for field in DateTimeField::ALL {
            let field_id = format!("{}/{field}", self.id);
            let edit = std::mem::take(&mut self.fields[field.index()]);
            self.fields[field.index()] = edit.with_id(field_id);
        }
        self
    }

    /// Show month names in the month field.
    #[must_use]
    pub fn with_month_names(mut self, names: MonthNames) -> Self {
        self.set_month_names(names);
        self
    }

    /// Set the initial value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<DateTimeValue>) -> Self {
        self.set_value(value);
        self
    }

    /// Set both overall bounds.
    #[must_use]
    pub fn with_bounds(mut self, min: Option<DateTimeValue>, max: Option<DateTimeValue>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self.recompute();
        self
    }

    /// Set the press-and-hold delay of every field.
    #[must_use]
    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.set_repeat_delay(delay);
        self
    }

    // ── Value and bounds ────────────────────────────────────────────

    /// Instance id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current value assembled from the five fields.
    #[must_use]
    pub fn value(&self) -> DateTimeValue {
        let mut value = DateTimeValue::DEFAULT_MIN;
        for field in DateTimeField::ALL {
            value.set(field, self.fields[field.index()].value());
        }
        value
    }

    /// Replace the value and recompute the bounds. No listener event.
    ///
    /// Components outside the bounds are clamped by the recomputation.
    pub fn set_value(&mut self, value: impl Into<DateTimeValue>) {
        let value = value.into();
        for field in DateTimeField::ALL {
            self.fields[field.index()].set_value(value.get(field));
        }
        self.recompute();
    }

    /// Overall lower bound, if set.
    #[must_use]
    pub const fn min_value(&self) -> Option<DateTimeValue> {
        self.min_value
    }

    /// Set or clear the overall lower bound and recompute.
    pub fn set_min_value(&mut self, min: Option<DateTimeValue>) {
        self.min_value = min;
        self.recompute();
    }

    /// Overall upper bound, if set.
    #[must_use]
    pub const fn max_value(&self) -> Option<DateTimeValue> {
        self.max_value
    }

    /// Set or clear the overall upper bound and recompute.
    pub fn set_max_value(&mut self, max: Option<DateTimeValue>) {
        self.max_value = max;
        self.recompute();
    }

    /// Per-field ranges for the current value.
    #[must_use]
    pub fn bounds(&self) -> FieldBounds {
        cascade_bounds(self.value(), self.min_value, self.max_value)
    }

    // ── Fields ──────────────────────────────────────────────────────

    /// Read access to one field.
    #[must_use]
    pub fn field(&self, field: DateTimeField) -> &SpinEdit {
        &self.fields[field.index()]
    }

    /// Write access to one field. Bounds are recomputed when the guard
    /// drops, if the field's value changed.
    ///
    /// Replacing the field's listener through the guard disconnects it from
    /// the choice's listener until [`set_listener`](Self::set_listener) is
    /// called again.
    pub fn field_mut(&mut self, field: DateTimeField) -> FieldMut<'_> {
        let version = self.fields[field.index()].version();
        FieldMut {
            choice: self,
            field,
            version,
        }
    }

    /// Step `field` up. Returns whether it changed.
    pub fn raise(&mut self, field: DateTimeField) -> bool {
        self.field_mut(field).raise()
    }

    /// Step `field` down. Returns whether it changed.
    pub fn lower(&mut self, field: DateTimeField) -> bool {
        self.field_mut(field).lower()
    }

    /// Type `text` into `field`.
    pub fn edit(&mut self, field: DateTimeField, text: &str) -> EditOutcome {
        self.field_mut(field).edit(text)
    }

    /// Redraw every field's text from its committed value.
    pub fn refresh(&mut self) {
        for edit in &mut self.fields {
            edit.refresh();
        }
    }

    /// Use `names` in the month field.
    pub fn set_month_names(&mut self, names: MonthNames) {
        self.fields[DateTimeField::Month.index()]
            .set_converter(Rc::new(MonthNameConverter::new(names)));
    }

    /// Show the month as a number again.
    pub fn clear_month_names(&mut self) {
        self.fields[DateTimeField::Month.index()].set_converter(Rc::new(PaddedConverter));
    }

    // ── Press and hold ──────────────────────────────────────────────

    /// Press and hold a step button of `field`. Returns whether another
    /// step is scheduled.
    pub fn press(&mut self, field: DateTimeField, direction: RepeatDirection, now: Instant) -> bool {
        self.field_mut(field).press(direction, now)
    }

    /// Release a step button of `field`. Idempotent.
    pub fn release(&mut self, field: DateTimeField, direction: RepeatDirection) {
        self.fields[field.index()].release(direction);
    }

    /// Release every held button.
    pub fn release_all(&mut self) {
        for edit in &mut self.fields {
            edit.release_all();
        }
    }

    /// Run due repeat steps on all fields. Returns whether any field has
    /// another step scheduled.
    pub fn poll_repeat(&mut self, now: Instant) -> bool {
        let mut scheduled = false;
        for field in DateTimeField::ALL {
            if self.fields[field.index()].is_repeating() {
                scheduled |= self.field_mut(field).poll_repeat(now);
            }
        }
        scheduled
    }

    /// Earliest scheduled repeat step across all fields.
    #[must_use]
    pub fn next_repeat_at(&self) -> Option<Instant> {
        self.fields.iter().filter_map(SpinEdit::next_repeat_at).min()
    }

    /// Set the press-and-hold delay of every field.
    pub fn set_repeat_delay(&mut self, delay: Duration) {
        for edit in &mut self.fields {
            edit.set_repeat_delay(delay);
        }
    }

    // ── Listener ────────────────────────────────────────────────────

    /// Attach a consumer listener. Only a weak reference is kept.
    pub fn set_listener<L: DateTimeChangeListener + 'static>(&mut self, listener: &Rc<L>) {
        let target: Weak<L> = Rc::downgrade(listener);
        let target: Weak<dyn DateTimeChangeListener> = target;
        for field in DateTimeField::ALL {
            self.fields[field.index()].set_listener(Rc::new(FieldRelay {
                field,
                target: target.clone(),
            }));
        }
        self.listener = Some(target);
    }

    /// Detach the consumer listener.
    pub fn clear_listener(&mut self) {
        for edit in &mut self.fields {
            edit.clear_listener();
        }
        self.listener = None;
    }

    /// Whether a live consumer listener is attached.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|listener| listener.strong_count() > 0)
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Re-run the cascade until clamping stops moving the value.
    fn recompute(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("recompute", choice = %self.id).entered();

        for _ in DateTimeField::ALL {
            let current = self.value();
            let bounds = cascade_bounds(current, self.min_value, self.max_value);
            for field in DateTimeField::ALL {
                self.fields[field.index()].set_min(bounds.lower.get(field));
            }
            for field in DateTimeField::ALL {
                self.fields[field.index()].set_max(bounds.upper.get(field));
            }
            if self.value() == current {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(value = %self.value(), "bounds recomputed");
    }

    fn notify_changed(&self) {
        if let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) {
            listener.on_changed(self.value());
        }
    }
}

/// Mutable access to one field of a [`DateTimeChoice`].
///
/// Dereferences to the [`SpinEdit`]. On drop, a changed value triggers the
/// bound cascade and the consumer's `on_changed`.
pub struct FieldMut<'a> {
    choice: &'a mut DateTimeChoice,
    field: DateTimeField,
    version: u64,
}

impl FieldMut<'_> {
    /// Which field this guard edits.
    #[must_use]
    pub const fn field(&self) -> DateTimeField {
        self.field
    }
}

impl Deref for FieldMut<'_> {
    type Target = SpinEdit;

    fn deref(&self) -> &SpinEdit {
        &self.choice.fields[self.field.index()]
    }
}

impl DerefMut for FieldMut<'_> {
    fn deref_mut(&mut self) -> &mut SpinEdit {
        &mut self.choice.fields[self.field.index()]
    }
}

impl Drop for FieldMut<'_> {
    fn drop(&mut self) {
        if self.choice.fields[self.field.index()].version() == self.version {
            return;
        }
        self.choice.recompute();
        self.choice.notify_changed();
    }
}

// ── Persistence ─────────────────────────────────────────────────────

/// Persisted state of a [`DateTimeChoice`]: the five field values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DateTimeChoiceState {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl Default for DateTimeChoiceState {
    fn default() -> Self {
        DateTimeValue::DEFAULT_MIN.into()
    }
}

impl From<DateTimeValue> for DateTimeChoiceState {
    fn from(value: DateTimeValue) -> Self {
        Self {
            year: value.year,
            month: value.month,
            day: value.day,
            hour: value.hour,
            minute: value.minute,
        }
    }
}

impl From<DateTimeChoiceState> for DateTimeValue {
    fn from(state: DateTimeChoiceState) -> Self {
        Self::new(state.year, state.month, state.day, state.hour, state.minute)
    }
}

impl Stateful for DateTimeChoice {
    type State = DateTimeChoiceState;

    fn state_key(&self) -> StateKey {
        StateKey::new("DateTimeChoice", &self.id)
    }

    fn save_state(&self) -> DateTimeChoiceState {
        self.value().into()
    }

    fn restore_state(&mut self, state: DateTimeChoiceState) {
        self.set_value(state);
    }
}
