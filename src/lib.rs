//! Locale string lookup, pluralization and interpolation for front-end
//! asset bundles.

pub mod config;
pub mod i18n;
