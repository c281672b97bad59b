#![forbid(unsafe_code)]

//! Localized month names for spinchoice.
//!
//! The month field of a date/time choice displays names instead of numbers
//! when it is given a [`MonthNames`] list. Lists come from a
//! [`MonthCatalog`], which resolves a locale tag through a fallback chain.

pub mod catalog;

pub use catalog::{I18nError, Locale, MonthCatalog, MonthNames};
