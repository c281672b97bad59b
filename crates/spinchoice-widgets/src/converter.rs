#![forbid(unsafe_code)]

//! Value converters: the text form of a spin field's integer value.
//!
//! A [`ValueConverter`] is injected per field and can be swapped at runtime.
//! Parsing never fails: malformed input yields `0`, which the field then
//! clamps into its range like any other value.

use spinchoice_i18n::MonthNames;

/// Bidirectional mapping between a field value and its displayed text.
pub trait ValueConverter {
    /// Text shown for `value`.
    fn format(&self, value: i32) -> String;

    /// Value typed as `text`. Must return `0` for text it cannot read.
    fn parse(&self, text: &str) -> i32;
}

/// Decimal converter that pads single digits with a leading zero.
///
/// `7` formats as `"07"`, `42` as `"42"`, `2024` as `"2024"`. Negative
/// values format without padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddedConverter;

impl ValueConverter for PaddedConverter {
    fn format(&self, value: i32) -> String {
        if (0..10).contains(&value) {
            format!("0{value}")
        } else {
            value.to_string()
        }
    }

    fn parse(&self, text: &str) -> i32 {
        text.parse().unwrap_or(0)
    }
}

/// Month converter showing localized names for 1-based months.
///
/// Parsing accepts any prefix of a month name (`"Sep"`, `"sept"`) and falls
/// back to decimal parsing, so `"9"` also selects September. Values outside
/// `1..=12` format as plain numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNameConverter {
    names: MonthNames,
}

impl MonthNameConverter {
    /// Converter over the given month names.
    #[must_use]
    pub fn new(names: MonthNames) -> Self {
        Self { names }
    }

    /// The month names in use.
    #[must_use]
    pub fn names(&self) -> &MonthNames {
        &self.names
    }
}

impl ValueConverter for MonthNameConverter {
    fn format(&self, value: i32) -> String {
        self.names
            .name(value)
            .map_or_else(|| PaddedConverter.format(value), str::to_owned)
    }

    fn parse(&self, text: &str) -> i32 {
        self.names
            .find_prefix(text)
            .unwrap_or_else(|| PaddedConverter.parse(text))
    }
}

/// Number of decimal digits needed to show `value`, at least 1.
///
/// Negative values count the digits of their magnitude.
#[must_use]
pub fn digit_count(value: i32) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinchoice_i18n::MonthCatalog;

    fn english() -> MonthNameConverter {
        MonthNameConverter::new(MonthCatalog::with_builtin().get("en").cloned().unwrap())
    }

    #[test]
    fn padded_format() {
        assert_eq!(PaddedConverter.format(0), "00");
        assert_eq!(PaddedConverter.format(7), "07");
        assert_eq!(PaddedConverter.format(10), "10");
        assert_eq!(PaddedConverter.format(1985), "1985");
        assert_eq!(PaddedConverter.format(-3), "-3");
    }

    #[test]
    fn padded_parse_tolerates_garbage() {
        assert_eq!(PaddedConverter.parse("07"), 7);
        assert_eq!(PaddedConverter.parse("+5"), 5);
        assert_eq!(PaddedConverter.parse("-5"), -5);
        assert_eq!(PaddedConverter.parse(""), 0);
        assert_eq!(PaddedConverter.parse("abc"), 0);
        assert_eq!(PaddedConverter.parse("1e3"), 0);
        assert_eq!(PaddedConverter.parse("99999999999"), 0);
    }

    #[test]
    fn padded_parse_rejects_surrounding_whitespace() {
        assert_eq!(PaddedConverter.parse(" 42 "), 0);
        assert_eq!(PaddedConverter.parse("42\n"), 0);
        assert_eq!(PaddedConverter.parse("\t7"), 0);
    }

    #[test]
    fn month_format_uses_names() {
        let conv = english();
        assert_eq!(conv.format(1), "January");
        assert_eq!(conv.format(12), "December");
        assert_eq!(conv.format(0), "00");
        assert_eq!(conv.format(13), "13");
    }

    #[test]
    fn month_parse_matches_prefix_then_number() {
        let conv = english();
        assert_eq!(conv.parse("Jan"), 1);
        assert_eq!(conv.parse("sep"), 9);
        assert_eq!(conv.parse("Ma"), 3);
        assert_eq!(conv.parse("11"), 11);
        assert_eq!(conv.parse("Smarch"), 0);
        assert_eq!(conv.parse(""), 0);
    }

    #[test]
    fn digit_counts() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
        assert_eq!(digit_count(2100), 4);
        assert_eq!(digit_count(-42), 2);
        assert_eq!(digit_count(i32::MIN), 10);
        assert_eq!(digit_count(i32::MAX), 10);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn canonical(text: &str) -> String {
            let value: i32 = text.parse().unwrap();
            if (0..10).contains(&value) {
                format!("0{value}")
            } else {
                value.to_string()
            }
        }

        proptest! {
            #[test]
            fn padded_round_trip(value in 0i32..10_000, pad in 0usize..3) {
                let text = format!("{}{value}", "0".repeat(pad));
                prop_assert_eq!(PaddedConverter.format(PaddedConverter.parse(&text)), canonical(&text));
            }

            #[test]
            fn padded_format_parse_identity(value in any::<i32>()) {
                prop_assert_eq!(PaddedConverter.parse(&PaddedConverter.format(value)), value);
            }

            #[test]
            fn month_names_round_trip(month in 1i32..=12) {
                let conv = english();
                let name = conv.format(month);
                prop_assert_eq!(conv.format(conv.parse(&name)), name);
            }
        }
    }
}
