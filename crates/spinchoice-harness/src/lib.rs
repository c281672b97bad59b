#![forbid(unsafe_code)]

//! Shared fixtures for spinchoice scenario tests.
//!
//! - [`EventLog`]: a listener for both fields and date/time choices that
//!   records every notification and can veto on demand.
//! - [`Repeating`] and [`drain_repeats`]: drive press-and-hold to completion
//!   with a simulated clock.
//! - [`save_json`] and [`restore_json`]: versioned persistence through JSON.

use std::cell::{Cell, RefCell};

use serde::Serialize;
use serde::de::DeserializeOwned;
use spinchoice_runtime::Instant;
use spinchoice_widgets::{
    DateTimeChangeListener, DateTimeChoice, DateTimeField, DateTimeValue, SpinEdit, Stateful,
    ValueChangeListener, VersionedState,
};

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A raise button was activated (`None` for a standalone field).
    Raising(Option<DateTimeField>),
    /// A lower button was activated.
    Lowering(Option<DateTimeField>),
    /// A change to the candidate was proposed.
    Changing(Option<DateTimeField>, i32),
    /// A standalone field committed this value.
    Changed(i32),
    /// A date/time choice committed this value.
    ValueChanged(DateTimeValue),
}

/// When an [`EventLog`] refuses a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Veto {
    #[default]
    Never,
    Always,
    /// Refuse candidates greater than the limit.
    Above(i32),
    /// Refuse every proposal for one field.
    Field(DateTimeField),
}

impl Veto {
    fn allows(self, field: Option<DateTimeField>, candidate: i32) -> bool {
        match self {
            Self::Never => true,
            Self::Always => false,
            Self::Above(limit) => candidate <= limit,
            Self::Field(vetoed) => field != Some(vetoed),
        }
    }
}

/// Recording listener.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<Event>>,
    veto: Cell<Veto>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_veto(veto: Veto) -> Self {
        let log = Self::default();
        log.veto.set(veto);
        log
    }

    pub fn set_veto(&self, veto: Veto) {
        self.veto.set(veto);
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Number of commits recorded.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Changed(_) | Event::ValueChanged(_)))
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl ValueChangeListener for EventLog {
    fn on_changing(&self, _source: &SpinEdit, candidate: i32) -> bool {
        self.push(Event::Changing(None, candidate));
        self.veto.get().allows(None, candidate)
    }

    fn on_changed(&self, source: &SpinEdit) {
        self.push(Event::Changed(source.value()));
    }

    fn on_raising(&self, _source: &SpinEdit) {
        self.push(Event::Raising(None));
    }

    fn on_lowering(&self, _source: &SpinEdit) {
        self.push(Event::Lowering(None));
    }
}

impl DateTimeChangeListener for EventLog {
    fn on_changing(&self, field: DateTimeField, candidate: i32) -> bool {
        self.push(Event::Changing(Some(field), candidate));
        self.veto.get().allows(Some(field), candidate)
    }

    fn on_changed(&self, value: DateTimeValue) {
        self.push(Event::ValueChanged(value));
    }

    fn on_raising(&self, field: DateTimeField) {
        self.push(Event::Raising(Some(field)));
    }

    fn on_lowering(&self, field: DateTimeField) {
        self.push(Event::Lowering(Some(field)));
    }
}

/// Anything with press-and-hold repeat steps.
pub trait Repeating {
    fn next_repeat_at(&self) -> Option<Instant>;
    fn poll_repeat(&mut self, now: Instant) -> bool;
}

impl Repeating for SpinEdit {
    fn next_repeat_at(&self) -> Option<Instant> {
        SpinEdit::next_repeat_at(self)
    }

    fn poll_repeat(&mut self, now: Instant) -> bool {
        SpinEdit::poll_repeat(self, now)
    }
}

impl Repeating for DateTimeChoice {
    fn next_repeat_at(&self) -> Option<Instant> {
        DateTimeChoice::next_repeat_at(self)
    }

    fn poll_repeat(&mut self, now: Instant) -> bool {
        DateTimeChoice::poll_repeat(self, now)
    }
}

/// Jump the clock to each scheduled step until none is left or `max_ticks`
/// steps ran. Returns the number of steps run.
pub fn drain_repeats<R: Repeating>(widget: &mut R, max_ticks: usize) -> usize {
    let mut ticks = 0;
    while ticks < max_ticks {
        let Some(at) = widget.next_repeat_at() else {
            break;
        };
        widget.poll_repeat(at);
        ticks += 1;
    }
    tracing::debug!(ticks, "repeat drained");
    ticks
}

/// Serialize a widget's versioned state.
pub fn save_json<W>(widget: &W) -> serde_json::Result<String>
where
    W: Stateful,
    W::State: Serialize,
{
    serde_json::to_string(&VersionedState::pack(widget))
}

/// Restore a widget from [`save_json`] output. Returns whether the stored
/// version matched.
pub fn restore_json<W>(widget: &mut W, json: &str) -> serde_json::Result<bool>
where
    W: Stateful,
    W::State: DeserializeOwned,
{
    let stored: VersionedState<W::State> = serde_json::from_str(json)?;
    Ok(stored.restore_into(widget))
}

/// Every `(field, value)` pair lies inside the field's range.
#[must_use]
pub fn fields_within_bounds(choice: &DateTimeChoice) -> bool {
    DateTimeField::ALL.into_iter().all(|field| {
        let edit = choice.field(field);
        edit.min() <= edit.value() && edit.value() <= edit.max()
    })
}
