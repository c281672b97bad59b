//! Month-name catalog with locale fallback.
//!
//! # Invariants
//!
//! 1. **Twelve names**: a [`MonthNames`] list always holds exactly twelve
//!    entries, January first. Construction rejects any other length.
//!
//! 2. **Fallback chain terminates**: every lookup tries the exact tag, then
//!    its language subtag, then walks the chain exactly once, returning
//!    `None` if no locale provides a list.
//!
//! 3. **Prefix search is total**: [`MonthNames::find_prefix`] scans every
//!    name in order and returns the first match, so an abbreviation such as
//!    `"Ma"` resolves to March, never May.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Wrong list length | Caller supplied != 12 names | `Err(WrongMonthCount)` |
//! | Empty locale tag | `""` passed to `add_locale` | `Err(InvalidLocale)` |
//! | Missing locale | Locale not loaded, chain exhausted | `None` / `Err(MissingLocale)` |

use ahash::AHashMap;

/// Locale identifier (e.g., `"en"`, `"en-US"`, `"ru"`).
pub type Locale = String;

/// Number of months in a calendar year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Errors from month catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale string was malformed.
    InvalidLocale(String),
    /// A month list did not contain exactly twelve names.
    WrongMonthCount { locale: String, count: usize },
    /// No locale in the lookup chain provides month names.
    MissingLocale(String),
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l:?}"),
            Self::WrongMonthCount { locale, count } => {
                write!(
                    f,
                    "locale '{locale}' has {count} month names, expected {MONTHS_PER_YEAR}"
                )
            }
            Self::MissingLocale(l) => write!(f, "no month names for locale '{l}'"),
        }
    }
}

impl std::error::Error for I18nError {}

/// Twelve month names, January first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNames {
    names: Vec<String>,
}

impl MonthNames {
    /// Build a list from exactly twelve names.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::WrongMonthCount`] when `names` does not hold
    /// twelve entries.
    pub fn new<I, S>(names: I) -> Result<Self, I18nError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != MONTHS_PER_YEAR {
            return Err(I18nError::WrongMonthCount {
                locale: String::new(),
                count: names.len(),
            });
        }
        Ok(Self { names })
    }

    /// Name of a 1-based month. `None` outside `1..=12`.
    #[must_use]
    pub fn name(&self, month: i32) -> Option<&str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    /// 1-based month whose name starts with `prefix` (case-insensitive).
    ///
    /// Exact-case matches win over case-folded ones. An empty or
    /// whitespace-only prefix matches nothing.
    #[must_use]
    pub fn find_prefix(&self, prefix: &str) -> Option<i32> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        let position = self
            .names
            .iter()
            .position(|name| name.starts_with(prefix))
            .or_else(|| {
                let folded = prefix.to_lowercase();
                self.names
                    .iter()
                    .position(|name| name.to_lowercase().starts_with(&folded))
            })?;
        i32::try_from(position + 1).ok()
    }

    /// Iterate names in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Widest name in chars, useful for sizing the month field.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.names
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Month-name lists keyed by locale, with a fallback chain.
///
/// # Example
///
/// ```
/// use spinchoice_i18n::catalog::MonthCatalog;
///
/// let catalog = MonthCatalog::with_builtin();
/// let names = catalog.get("de-AT").unwrap();
/// assert_eq!(names.name(3), Some("März"));
/// assert_eq!(names.find_prefix("Dez"), Some(12));
///
/// // Unknown locales fall back to English.
/// assert_eq!(catalog.get("xx").unwrap().name(1), Some("January"));
/// ```
#[derive(Debug, Clone)]
pub struct MonthCatalog {
    locales: AHashMap<Locale, MonthNames>,
    fallback_chain: Vec<Locale>,
}

impl Default for MonthCatalog {
    fn default() -> Self {
        Self::new()
    }
}

const BUILTIN: &[(&str, [&str; MONTHS_PER_YEAR])] = &[
    (
        "en",
        [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
    ),
    (
        "de",
        [
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ],
    ),
    (
        "fr",
        [
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ],
    ),
    (
        "es",
        [
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ],
    ),
    (
        "ru",
        [
            "Январь",
            "Февраль",
            "Март",
            "Апрель",
            "Май",
            "Июнь",
            "Июль",
            "Август",
            "Сентябрь",
            "Октябрь",
            "Ноябрь",
            "Декабрь",
        ],
    ),
];

impl MonthCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locales: AHashMap::new(),
            fallback_chain: Vec::new(),
        }
    }

    /// Catalog preloaded with `en`, `de`, `fr`, `es` and `ru`, falling back
    /// to `en`.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();
        for (locale, names) in BUILTIN {
            let names = MonthNames {
                names: names.iter().map(|n| (*n).to_owned()).collect(),
            };
            catalog.locales.insert((*locale).to_owned(), names);
        }
        catalog.fallback_chain = vec!["en".into()];
        catalog
    }

    /// Add or replace the month names for a locale.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::InvalidLocale`] for an empty tag and
    /// [`I18nError::WrongMonthCount`] when `names` is not twelve long.
    pub fn add_locale<I, S>(&mut self, locale: impl Into<String>, names: I) -> Result<(), I18nError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locale = locale.into();
        if locale.trim().is_empty() {
            return Err(I18nError::InvalidLocale(locale));
        }
        let names = MonthNames::new(names).map_err(|err| match err {
            I18nError::WrongMonthCount { count, .. } => I18nError::WrongMonthCount {
                locale: locale.clone(),
                count,
            },
            other => other,
        })?;
        self.locales.insert(locale, names);
        Ok(())
    }

    /// Set the fallback chain (tried in order when a locale is missing).
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// Look up month names for a locale.
    ///
    /// Tries the exact tag, then its language subtag (`"de-AT"` -> `"de"`),
    /// then the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&MonthNames> {
        if let Some(names) = self.locales.get(locale) {
            return Some(names);
        }

        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        if language != locale {
            if let Some(names) = self.locales.get(language) {
                return Some(names);
            }
        }

        self.fallback_chain
            .iter()
            .filter(|fallback| fallback.as_str() != locale)
            .find_map(|fallback| self.locales.get(fallback.as_str()))
    }

    /// Like [`get`](Self::get) but reports a missing locale as an error.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::MissingLocale`] when no locale in the chain
    /// provides month names.
    pub fn resolve(&self, locale: &str) -> Result<&MonthNames, I18nError> {
        self.get(locale)
            .ok_or_else(|| I18nError::MissingLocale(locale.to_owned()))
    }

    /// All registered locale tags.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }
}
