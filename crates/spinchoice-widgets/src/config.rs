#![forbid(unsafe_code)]

//! Declarative widget configuration.
//!
//! [`SpinEditConfig`] and [`DateTimeChoiceConfig`] describe a widget as
//! plain data. They are validated once, in `build`, so a bad config is
//! reported as a [`ConfigError`] instead of being silently clamped the way
//! runtime input is.
//!
//! With the `policy-config` feature both types deserialize from TOML:
//!
//! ```toml
//! locale = "de"
//! repeat_delay_ms = 80
//!
//! [min]
//! year = 1985
//! month = 4
//! day = 13
//! hour = 8
//! minute = 40
//! ```

use std::fmt;

use spinchoice_i18n::{I18nError, MonthCatalog};
use web_time::Duration;

use crate::date_time::DateTimeValue;
use crate::date_time_choice::DateTimeChoice;
use crate::spin_edit::{SpinEdit, max_for_ems};

/// Locale value that asks for the system locale.
pub const SYSTEM_LOCALE: &str = "system";

/// Widest supported digit width; `10^9 - 1` still fits in an `i32`.
pub const MAX_EMS: u32 = 9;

/// Errors from validating or loading a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    Parse(String),
    /// Digit width outside `1..=MAX_EMS`.
    InvalidEms(u32),
    /// `min > max`.
    InvalidRange { min: i32, max: i32 },
    /// The initial value lies outside `[min, max]`.
    ValueOutOfRange { value: i32, min: i32, max: i32 },
    /// Not a real calendar date and time.
    InvalidDate(DateTimeValue),
    /// `min > max` for a date/time choice.
    InvertedBounds {
        min: DateTimeValue,
        max: DateTimeValue,
    },
    /// The initial date/time lies outside the bounds.
    DateOutOfRange(DateTimeValue),
    /// Month names for the locale could not be resolved.
    Locale(I18nError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::InvalidEms(ems) => write!(f, "digit width {ems} is not in 1..={MAX_EMS}"),
            Self::InvalidRange { min, max } => write!(f, "min {min} is greater than max {max}"),
            Self::ValueOutOfRange { value, min, max } => {
                write!(f, "value {value} is outside {min}..={max}")
            }
            Self::InvalidDate(value) => write!(f, "{value} is not a calendar date"),
            Self::InvertedBounds { min, max } => {
                write!(f, "min {min} is later than max {max}")
            }
            Self::DateOutOfRange(value) => write!(f, "{value} is outside the configured bounds"),
            Self::Locale(err) => write!(f, "month names: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Locale(err) => Some(err),
            _ => None,
        }
    }
}

impl From<I18nError> for ConfigError {
    fn from(err: I18nError) -> Self {
        Self::Locale(err)
    }
}

#[cfg(feature = "policy-config")]
fn parse_toml<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Configuration for a standalone [`SpinEdit`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct SpinEditConfig {
    /// Instance id.
    pub id: Option<String>,
    /// Digit width.
    pub ems: u32,
    /// Lower bound.
    pub min: i32,
    /// Upper bound. Defaults to the widest value `ems` digits can show.
    pub max: Option<i32>,
    /// Initial value. Defaults to `min`.
    pub value: Option<i32>,
    /// Press-and-hold delay in milliseconds.
    pub repeat_delay_ms: u64,
}

impl Default for SpinEditConfig {
    fn default() -> Self {
        Self {
            id: None,
            ems: crate::spin_edit::DEFAULT_EMS,
            min: 0,
            max: None,
            value: None,
            repeat_delay_ms: spinchoice_runtime::DEFAULT_REPEAT_DELAY.as_millis() as u64,
        }
    }
}

impl SpinEditConfig {
    /// Parse from TOML.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse_toml(text)
    }

    /// Effective upper bound.
    #[must_use]
    pub fn effective_max(&self) -> i32 {
        self.max.unwrap_or_else(|| max_for_ems(self.ems))
    }

    /// Check the config without building a widget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_EMS).contains(&self.ems) {
            return Err(ConfigError::InvalidEms(self.ems));
        }
        let (min, max) = (self.min, self.effective_max());
        if min > max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        match self.value {
            Some(value) if !(min..=max).contains(&value) => {
                Err(ConfigError::ValueOutOfRange { value, min, max })
            }
            _ => Ok(()),
        }
    }

    /// Validate and build the field.
    pub fn build(&self) -> Result<SpinEdit, ConfigError> {
        self.validate()?;
        let mut field = SpinEdit::new()
            .with_ems(self.ems)
            .with_range(self.min, self.effective_max())
            .with_value(self.value.unwrap_or(self.min))
            .with_repeat_delay(Duration::from_millis(self.repeat_delay_ms));
        if let Some(id) = &self.id {
            field = field.with_id(id.clone());
        }
        Ok(field)
    }
}

/// Configuration for a [`DateTimeChoice`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct DateTimeChoiceConfig {
    /// Instance id.
    pub id: Option<String>,
    /// Overall lower bound.
    pub min: Option<DateTimeValue>,
    /// Overall upper bound.
    pub max: Option<DateTimeValue>,
    /// Initial value. Defaults to `1970-01-01T00:00`, clamped into the
    /// bounds.
    pub value: Option<DateTimeValue>,
    /// Month-name locale, or [`SYSTEM_LOCALE`]. Months show as numbers when
    /// absent.
    pub locale: Option<String>,
    /// Press-and-hold delay in milliseconds.
    pub repeat_delay_ms: u64,
}

impl Default for DateTimeChoiceConfig {
    fn default() -> Self {
        Self {
            id: None,
            min: None,
            max: None,
            value: None,
            locale: None,
            repeat_delay_ms: spinchoice_runtime::DEFAULT_REPEAT_DELAY.as_millis() as u64,
        }
    }
}

impl DateTimeChoiceConfig {
    /// Parse from TOML.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse_toml(text)
    }

    /// Check dates and bounds without building a widget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.min, self.max, self.value].into_iter().flatten() {
            if !value.is_valid() {
                return Err(ConfigError::InvalidDate(value));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ConfigError::InvertedBounds { min, max });
            }
        }
        if let Some(value) = self.value {
            let below = self.min.is_some_and(|min| value < min);
            let above = self.max.is_some_and(|max| value > max);
            if below || above {
                return Err(ConfigError::DateOutOfRange(value));
            }
        }
        Ok(())
    }

    /// Validate and build with the built-in month names.
    pub fn build(&self) -> Result<DateTimeChoice, ConfigError> {
        self.build_with_catalog(&MonthCatalog::with_builtin())
    }

    /// Validate and build, resolving month names from `catalog`.
    pub fn build_with_catalog(&self, catalog: &MonthCatalog) -> Result<DateTimeChoice, ConfigError> {
        self.validate()?;

        let mut choice = DateTimeChoice::new()
            .with_bounds(self.min, self.max)
            .with_repeat_delay(Duration::from_millis(self.repeat_delay_ms));
        if let Some(id) = &self.id {
            choice = choice.with_id(id.clone());
        }

        match self.locale.as_deref() {
            None => {}
            Some(SYSTEM_LOCALE) => {
                if let Some(names) = spinchoice_runtime::month_names_for_system(catalog) {
                    choice.set_month_names(names);
                }
            }
            Some(locale) => choice.set_month_names(catalog.resolve(locale)?.clone()),
        }

        if let Some(value) = self.value {
            choice.set_value(value);
        }
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_time::DateTimeField;

    const MIN: DateTimeValue = DateTimeValue::new(1985, 4, 13, 8, 40);
    const MAX: DateTimeValue = DateTimeValue::new(2013, 8, 15, 2, 44);

    #[test]
    fn default_spin_edit_config_builds_default_field() {
        let field = SpinEditConfig::default().build().unwrap();
        assert_eq!((field.min(), field.max(), field.value()), (0, 99, 0));
        assert_eq!(field.repeater().delay(), Duration::from_millis(100));
    }

    #[test]
    fn spin_edit_config_applies_every_setting() {
        let config = SpinEditConfig {
            id: Some("volume".into()),
            ems: 3,
            min: 10,
            max: None,
            value: Some(50),
            repeat_delay_ms: 40,
        };
        let field = config.build().unwrap();
        assert_eq!(field.id(), "volume");
        assert_eq!((field.min(), field.max(), field.value()), (10, 999, 50));
        assert_eq!(field.text(), "50");
        assert_eq!(field.repeater().delay(), Duration::from_millis(40));
    }

    #[test]
    fn spin_edit_config_rejects_bad_values() {
        let bad_ems = SpinEditConfig {
            ems: 0,
            ..SpinEditConfig::default()
        };
        assert_eq!(bad_ems.validate(), Err(ConfigError::InvalidEms(0)));

        let inverted = SpinEditConfig {
            min: 50,
            max: Some(10),
            ..SpinEditConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvalidRange { min: 50, max: 10 })
        );

        let outside = SpinEditConfig {
            value: Some(120),
            ..SpinEditConfig::default()
        };
        assert_eq!(
            outside.build().unwrap_err(),
            ConfigError::ValueOutOfRange {
                value: 120,
                min: 0,
                max: 99
            }
        );
    }

    #[test]
    fn date_time_config_builds_bounded_choice() {
        let config = DateTimeChoiceConfig {
            id: Some("booking".into()),
            min: Some(MIN),
            max: Some(MAX),
            value: Some(DateTimeValue::new(2000, 2, 29, 12, 0)),
            locale: Some("en".into()),
            repeat_delay_ms: 250,
        };
        let choice = config.build().unwrap();
        assert_eq!(choice.id(), "booking");
        assert_eq!(choice.min_value(), Some(MIN));
        assert_eq!(choice.value(), DateTimeValue::new(2000, 2, 29, 12, 0));
        assert_eq!(choice.field(DateTimeField::Month).text(), "February");
        assert_eq!(choice.field(DateTimeField::Day).max(), 29);
    }

    #[test]
    fn date_time_config_without_value_clamps_default() {
        let config = DateTimeChoiceConfig {
            min: Some(MIN),
            ..DateTimeChoiceConfig::default()
        };
        assert_eq!(config.build().unwrap().value(), MIN);
    }

    #[test]
    fn date_time_config_rejects_bad_dates() {
        let feb_30 = DateTimeValue::new(2023, 2, 30, 0, 0);
        let config = DateTimeChoiceConfig {
            value: Some(feb_30),
            ..DateTimeChoiceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDate(feb_30)));

        let inverted = DateTimeChoiceConfig {
            min: Some(MAX),
            max: Some(MIN),
            ..DateTimeChoiceConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvertedBounds { min: MAX, max: MIN })
        );

        let early = DateTimeValue::new(1980, 1, 1, 0, 0);
        let outside = DateTimeChoiceConfig {
            min: Some(MIN),
            value: Some(early),
            ..DateTimeChoiceConfig::default()
        };
        assert_eq!(outside.validate(), Err(ConfigError::DateOutOfRange(early)));
    }

    #[test]
    fn unknown_locale_is_reported() {
        let config = DateTimeChoiceConfig {
            locale: Some("tlh".into()),
            ..DateTimeChoiceConfig::default()
        };
        let err = config.build_with_catalog(&MonthCatalog::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Locale(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("month names: "));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::InvalidRange { min: 5, max: 1 }.to_string(),
            "min 5 is greater than max 1"
        );
        assert_eq!(
            ConfigError::DateOutOfRange(MIN).to_string(),
            "1985-04-13T08:40 is outside the configured bounds"
        );
    }

    #[cfg(feature = "policy-config")]
    mod toml_loading {
        use super::*;

        #[test]
        fn spin_edit_from_toml() {
            let config = SpinEditConfig::from_toml_str(
                r#"
                ems = 4
                min = 1900
                value = 1985
                "#,
            )
            .unwrap();
            let field = config.build().unwrap();
            assert_eq!((field.min(), field.max(), field.value()), (1900, 9999, 1985));
        }

        #[test]
        fn date_time_from_toml() {
            let config = DateTimeChoiceConfig::from_toml_str(
                r#"
                locale = "de"
                repeat_delay_ms = 80

                [min]
                year = 1985
                month = 4
                day = 13
                hour = 8
                minute = 40
                "#,
            )
            .unwrap();
            assert_eq!(config.min, Some(MIN));
            let choice = config.build().unwrap();
            assert_eq!(choice.value(), MIN);
            assert_eq!(choice.field(DateTimeField::Month).text(), "April");
        }

        #[test]
        fn unknown_keys_are_rejected() {
            let err = SpinEditConfig::from_toml_str("emz = 3").unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }
    }
}
