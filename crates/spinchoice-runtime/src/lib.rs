#![forbid(unsafe_code)]

//! Runtime support for spinchoice widgets.
//!
//! - [`repeat`]: the press-and-hold repeat timer driven by the host's clock.
//! - [`locale`]: system locale detection for picking month names.

pub mod locale;
pub mod repeat;

pub use locale::{detect_system_locale, month_names_for_system};
pub use repeat::{DEFAULT_REPEAT_DELAY, RepeatDirection, Repeater};
pub use web_time::{Duration, Instant};
