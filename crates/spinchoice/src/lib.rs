#![forbid(unsafe_code)]

//! spinchoice public facade.
//!
//! Re-exports the member crates and a [`prelude`] covering the common
//! surface: fields, the date/time choice, listeners, converters and the
//! repeat timer types.
//!
//! ```
//! use spinchoice::prelude::*;
//!
//! let mut choice = DateTimeChoice::new()
//!     .with_bounds(Some(DateTimeValue::new(1985, 4, 13, 8, 40)), None)
//!     .with_value(DateTimeValue::new(1985, 4, 13, 8, 40));
//! assert!(!choice.lower(DateTimeField::Minute));
//! assert_eq!(choice.field(DateTimeField::Day).min(), 13);
//! ```

pub use spinchoice_i18n as i18n;
pub use spinchoice_runtime as runtime;
pub use spinchoice_widgets as widgets;

pub mod prelude {
    pub use spinchoice_i18n::{I18nError, MonthCatalog, MonthNames};
    pub use spinchoice_runtime::{Duration, Instant, RepeatDirection, Repeater};
    pub use spinchoice_widgets::{
        ConfigError, DateTimeChangeListener, DateTimeChoice, DateTimeChoiceConfig, DateTimeField,
        DateTimeValue, EditOutcome, MonthNameConverter, PaddedConverter, SpinButtons, SpinEdit,
        SpinEditConfig, SpinSignal, Stateful, ValueChangeListener, ValueConverter,
    };
}
