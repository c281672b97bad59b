#![forbid(unsafe_code)]

//! Calendar values and the cascading bound computation.
//!
//! A [`DateTimeValue`] is the `(year, month, day, hour, minute)` tuple shown
//! by a date/time choice. Its derived ordering is lexicographic in that
//! order, which is also the order in which [`cascade_bounds`] tightens
//! field ranges.
//!
//! # The cascade
//!
//! Given the current value and optional overall bounds, [`cascade_bounds`]
//! returns one `[lower, upper]` pair per field. A field is restricted by the
//! overall minimum only while every more significant field of the current
//! value sits at (or below) the minimum's corresponding field; as soon as
//! the current value is past the minimum in a more significant field, the
//! remaining fields keep their natural range. The maximum is the mirror
//! image.
//!
//! With a minimum of `1985-04-13T08:40`:
//!
//! | Current value | Day range | Hour range |
//! |---------------|-----------|------------|
//! | `1990-01-01T00:00` | `1..=31` | `0..=23` |
//! | `1985-04-20T00:00` | `13..=30` | `0..=23` |
//! | `1985-04-13T08:40` | `13..=30` | `8..=23` |

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// One component of a [`DateTimeValue`], most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    any(feature = "state-persistence", feature = "policy-config"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DateTimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

impl DateTimeField {
    /// All fields, most significant first.
    pub const ALL: [Self; 5] = [Self::Year, Self::Month, Self::Day, Self::Hour, Self::Minute];

    /// Position in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }

    /// Digit width of the field's text box.
    #[must_use]
    pub const fn ems(self) -> u32 {
        match self {
            Self::Year => 4,
            _ => 2,
        }
    }
}

impl fmt::Display for DateTimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A calendar value with minute precision. Months and days are 1-based.
///
/// Values are not validated: a choice may briefly hold day 31 in a 30-day
/// month until its bounds are recomputed. [`to_naive`](Self::to_naive)
/// reports such values as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    any(feature = "state-persistence", feature = "policy-config"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DateTimeValue {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl DateTimeValue {
    /// Lower bound used when no minimum is set: `1970-01-01T00:00`.
    pub const DEFAULT_MIN: Self = Self::new(1970, 1, 1, 0, 0);

    /// Upper bound used when no maximum is set: `2100-12-31T23:59`.
    ///
    /// The day component is only a ceiling; the effective day bound is the
    /// length of the current month.
    pub const DEFAULT_MAX: Self = Self::new(2100, 12, 31, 23, 59);

    #[must_use]
    pub const fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Read one component.
    #[must_use]
    pub const fn get(&self, field: DateTimeField) -> i32 {
        match field {
            DateTimeField::Year => self.year,
            DateTimeField::Month => self.month,
            DateTimeField::Day => self.day,
            DateTimeField::Hour => self.hour,
            DateTimeField::Minute => self.minute,
        }
    }

    /// Write one component.
    pub fn set(&mut self, field: DateTimeField, value: i32) {
        match field {
            DateTimeField::Year => self.year = value,
            DateTimeField::Month => self.month = value,
            DateTimeField::Day => self.day = value,
            DateTimeField::Hour => self.hour = value,
            DateTimeField::Minute => self.minute = value,
        }
    }

    /// Copy with one component replaced.
    #[must_use]
    pub fn with(mut self, field: DateTimeField, value: i32) -> Self {
        self.set(field, value);
        self
    }

    /// Convert to a chrono value. `None` if the components are not a real
    /// calendar date and time.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        let hour = u32::try_from(self.hour).ok()?;
        let minute = u32::try_from(self.minute).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)?.and_hms_opt(hour, minute, 0)
    }

    /// Whether the components form a real calendar date and time.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.to_naive().is_some()
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(
            value.year(),
            value.month() as i32,
            value.day() as i32,
            value.hour() as i32,
            value.minute() as i32,
        )
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Number of days in `month` of `year`, leap years included.
///
/// Months outside `1..=12`, or years chrono cannot represent, report 31.
#[must_use]
pub fn days_in_month(year: i32, month: i32) -> i32 {
    const FALLBACK: i32 = 31;

    let Ok(month) = u32::try_from(month) else {
        return FALLBACK;
    };
    let next = if month == 12 {
        year.checked_add(1)
            .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    match (NaiveDate::from_ymd_opt(year, month, 1), next) {
        (Some(first), Some(next)) => {
            i32::try_from(next.signed_duration_since(first).num_days()).unwrap_or(FALLBACK)
        }
        _ => FALLBACK,
    }
}

/// Per-field `[lower, upper]` ranges, each stored as a [`DateTimeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub lower: DateTimeValue,
    pub upper: DateTimeValue,
}

impl FieldBounds {
    /// Inclusive range for one field.
    #[must_use]
    pub const fn range(&self, field: DateTimeField) -> (i32, i32) {
        (self.lower.get(field), self.upper.get(field))
    }
}

/// Compute each field's range for `current` within `[min, max]`.
///
/// Absent bounds fall back to [`DateTimeValue::DEFAULT_MIN`] and
/// [`DateTimeValue::DEFAULT_MAX`]. The upper day bound starts at the length
/// of the current month.
#[must_use]
pub fn cascade_bounds(
    current: DateTimeValue,
    min: Option<DateTimeValue>,
    max: Option<DateTimeValue>,
) -> FieldBounds {
    let mut lower = DateTimeValue::DEFAULT_MIN;
    let mut upper = DateTimeValue {
        day: days_in_month(current.year, current.month),
        ..DateTimeValue::DEFAULT_MAX
    };

    if let Some(min) = min {
        for field in DateTimeField::ALL {
            let bound = min.get(field);
            lower.set(field, bound);
            if current.get(field) > bound {
                break;
            }
        }
    }

    if let Some(max) = max {
        for field in DateTimeField::ALL {
            let bound = max.get(field);
            upper.set(field, bound);
            if current.get(field) < bound {
                break;
            }
        }
    }

    FieldBounds { lower, upper }
}
