//! Internationalization (i18n) runtime for locale asset bundles.
//!
//! Looks up translated strings in a nested catalog, walks a locale fallback
//! chain, selects plural forms, and substitutes `{{name}}` / `%{name}`
//! placeholders. Every failure degrades to a visible bracketed placeholder
//! instead of an error.
//!
//! # Architecture
//!
//! - `catalog`: Locale → namespace → path tree of strings, loaded from JSON
//! - `registry`: Metadata and plural rules for the locales this bundle ships
//! - `plural`: Plural categories and per-locale rules
//! - `options`: Scopes, option bags and first-set-wins merging
//! - `interpolate`: Placeholder substitution
//! - `translator`: The `I18n` context (lookup, translate, pluralize, numbers, dates)
//! - `format`: Number, percentage and byte-size formatting
//! - `date`: Localized `strftime`
//! - `verbose`: Key-numbering decorator and session flag
//! - `validator`: Placeholder parity checks between locales
//! - `metrics`: Translation counters and catalog coverage
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_bundle::i18n::{Catalog, I18n, Options};
//!
//! let mut i18n = I18n::new(Catalog::builtin());
//! i18n.set_locale("lt");
//!
//! let label = i18n.t("topic.replies", &Options::new().with_count(21.0));
//! ```

mod catalog;
mod date;
mod format;
mod interpolate;
mod metrics;
mod options;
mod plural;
mod registry;
mod translator;
mod validator;
mod verbose;

pub use catalog::{Catalog, CatalogError, Entry};
pub use date::strftime;
pub use format::{format_number, NumberFormat};
pub use interpolate::{interpolate, missing_placeholder, placeholder_names, InterpolationError};
pub use metrics::{CoverageReport, MetricsReport, TranslationMetrics};
pub use options::{prepare_options, Options, Scope};
pub use plural::{PluralCategory, PluralRule};
pub use registry::{Locale, LocaleConfig, LocaleRegistry};
pub use translator::{I18n, I18nConfig, LAST_RESORT_LOCALE, NAMESPACE};
pub use validator::{TranslationValidator, ValidationReport};
pub use verbose::{
    enable_verbose_localization_session, is_verbose_session, translator_from_config,
    FileSessionStore, MemorySessionStore, SessionStore, Translate, VerboseTranslator,
    VERBOSE_ENABLED_NOTICE, VERBOSE_SESSION_KEY,
};
