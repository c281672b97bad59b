#![forbid(unsafe_code)]

//! System locale detection for month-name selection.
//!
//! The month field of a date/time choice shows localized names. The host
//! can pass a locale explicitly; otherwise [`detect_system_locale`] reads
//! the process environment once and [`month_names_for_system`] resolves it
//! against a [`MonthCatalog`].

use spinchoice_i18n::{Locale, MonthCatalog, MonthNames};
use std::env;

/// Detect the system locale from environment variables.
///
/// Preference order: `LC_ALL`, then `LC_TIME`, then `LANG`. Falls back to
/// `"en"` when unknown.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let lc_all = env::var("LC_ALL").ok();
    let lc_time = env::var("LC_TIME").ok();
    let lang = env::var("LANG").ok();
    detect_system_locale_from(lc_all.as_deref(), lc_time.as_deref(), lang.as_deref())
}

/// Month names for the detected system locale, resolved through `catalog`.
#[must_use]
pub fn month_names_for_system(catalog: &MonthCatalog) -> Option<MonthNames> {
    let locale = detect_system_locale();
    let names = catalog.get(&locale).cloned();
    tracing::debug!(%locale, found = names.is_some(), "resolved system month names");
    names
}

fn detect_system_locale_from(
    lc_all: Option<&str>,
    lc_time: Option<&str>,
    lang: Option<&str>,
) -> Locale {
    lc_all
        .and_then(normalize_locale_raw)
        .or_else(|| lc_time.and_then(normalize_locale_raw))
        .or_else(|| lang.and_then(normalize_locale_raw))
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_locale_raw(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw);
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut normalized = raw.replace('_', "-");
    if normalized.eq_ignore_ascii_case("c") || normalized.eq_ignore_ascii_case("posix") {
        normalized.clear();
        normalized.push_str("en");
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_lc_all() {
        let locale = detect_system_locale_from(Some("fr_FR.UTF-8"), None, Some("en_US.UTF-8"));
        assert_eq!(locale, "fr-FR");
    }

    #[test]
    fn detect_uses_lc_time_before_lang() {
        let locale = detect_system_locale_from(None, Some("de_DE.UTF-8"), Some("en_US.UTF-8"));
        assert_eq!(locale, "de-DE");
    }

    #[test]
    fn detect_uses_lang_when_others_missing() {
        let locale = detect_system_locale_from(None, None, Some("ru_RU.UTF-8"));
        assert_eq!(locale, "ru-RU");
    }

    #[test]
    fn detect_defaults_to_en() {
        assert_eq!(detect_system_locale_from(None, None, None), "en");
        assert_eq!(detect_system_locale_from(Some(""), Some(" "), None), "en");
    }

    #[test]
    fn posix_and_c_map_to_en() {
        assert_eq!(detect_system_locale_from(Some("C"), None, None), "en");
        assert_eq!(detect_system_locale_from(None, None, Some("POSIX")), "en");
    }

    #[test]
    fn modifiers_and_codesets_are_stripped() {
        assert_eq!(
            detect_system_locale_from(Some("de_AT.ISO-8859-1@euro"), None, None),
            "de-AT"
        );
    }

    #[test]
    fn detected_locale_resolves_in_builtin_catalog() {
        let catalog = MonthCatalog::with_builtin();
        let locale = detect_system_locale_from(None, None, Some("es_MX.UTF-8"));
        assert_eq!(catalog.get(&locale).unwrap().name(2), Some("febrero"));
    }

    #[test]
    fn system_month_names_always_resolve_with_builtin_fallback() {
        let catalog = MonthCatalog::with_builtin();
        assert!(month_names_for_system(&catalog).is_some());
    }
}
