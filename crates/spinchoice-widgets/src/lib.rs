#![forbid(unsafe_code)]

//! Spin-edit fields and the cascading date/time choice.
//!
//! # Role in spinchoice
//! `spinchoice-widgets` holds the editing state machines. Nothing here
//! draws: hosts feed discrete signals (raise, lower, typed text, refresh,
//! press/release and clock polls) and read back values, texts, ranges and
//! button enablement.
//!
//! # Modules
//! - [`spin_edit`]: one bounded integer with its text and step buttons.
//! - [`converter`]: value/text mapping, including localized month names.
//! - [`listener`]: the propose/commit notification protocol of a field.
//! - [`date_time`]: calendar values and the bound cascade.
//! - [`date_time_choice`]: five fields kept inside an overall range.
//! - [`stateful`]: save and restore of committed values.
//! - [`config`]: declarative, validated widget construction.
//!
//! # Feature flags
//! - `state-persistence`: serde derives on saved state.
//! - `policy-config`: TOML loading of widget configs.
//! - `tracing`: trace events for commits, vetoes and recomputation.

pub mod config;
pub mod converter;
pub mod date_time;
pub mod date_time_choice;
pub mod listener;
pub mod spin_edit;
pub mod stateful;

pub use config::{ConfigError, DateTimeChoiceConfig, SpinEditConfig};
pub use converter::{MonthNameConverter, PaddedConverter, ValueConverter, digit_count};
pub use date_time::{DateTimeField, DateTimeValue, FieldBounds, cascade_bounds, days_in_month};
pub use date_time_choice::{DateTimeChangeListener, DateTimeChoice, DateTimeChoiceState, FieldMut};
pub use listener::ValueChangeListener;
pub use spin_edit::{EditOutcome, SpinButtons, SpinEdit, SpinEditState, SpinSignal};
pub use stateful::{StateKey, Stateful, VersionedState};
