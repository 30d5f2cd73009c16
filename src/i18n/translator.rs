//! The `I18n` context: catalog lookup, locale fallback, pluralization and
//! rendering of translated strings.
//!
//! Nothing in here fails loudly. A missing key renders as
//! `[<locale>.<scope>]` and a broken interpolation degrades to the same
//! placeholder, so a localization gap never breaks the page.

use crate::config::Config;
use crate::i18n::catalog::{Catalog, Entry};
use crate::i18n::date::strftime;
use crate::i18n::format::{apply_template, format_number, scale_bytes, NumberFormat};
use crate::i18n::interpolate::{interpolate, InterpolationError};
use crate::i18n::metrics::{CoverageReport, TranslationMetrics};
use crate::i18n::options::{prepare_options, Options, Scope, SEPARATOR};
use crate::i18n::plural::PluralRule;
use crate::i18n::registry::{Locale, LocaleRegistry};
use anyhow::{Context, Result};
use chrono::{Datelike, Timelike};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Namespace segment every catalog path starts with.
pub const NAMESPACE: &str = "js";

/// Locale tried last, regardless of configuration.
pub const LAST_RESORT_LOCALE: &str = "en";

/// Locale settings for one `I18n` context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    /// Active locale; `None` means the default locale is active
    pub locale: Option<String>,

    /// Locale used when no active locale is set, and as a fallback
    pub default_locale: String,

    /// Locale tried right after the requested one
    pub fallback_locale: Option<String>,

    /// Disable every fallback step
    pub no_fallbacks: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale: None,
            default_locale: Locale::default_locale().code().to_string(),
            fallback_locale: None,
            no_fallbacks: false,
        }
    }
}

impl From<&Config> for I18nConfig {
    fn from(config: &Config) -> Self {
        Self {
            locale: config.locale.clone(),
            default_locale: config.default_locale.clone(),
            fallback_locale: config.fallback_locale.clone(),
            no_fallbacks: config.no_fallbacks,
        }
    }
}

impl I18nConfig {
    /// Configured locale codes that are not enabled in the registry.
    ///
    /// Such locales still work when a loaded bundle provides them, but they
    /// get the plural rule of their language subtag.
    pub fn unregistered_locales(&self) -> Vec<&str> {
        let mut codes = vec![self.default_locale.as_str()];
        codes.extend(self.locale.as_deref());
        codes.extend(self.fallback_locale.as_deref());

        let mut unregistered: Vec<&str> = codes
            .into_iter()
            .filter(|code| Locale::from_code(code).is_none())
            .collect();
        unregistered.sort_unstable();
        unregistered.dedup();
        unregistered
    }
}

/// Outcome of one attempt in the fallback chain.
enum Resolution<'a> {
    /// A catalog entry (a leaf, or a tree when no count was given).
    Found(Cow<'a, Entry>),
    /// A plural node had none of the candidate forms; carries the placeholder.
    MissingForm(String),
}

/// Per-attempt state while walking the fallback chain.
struct Attempt<'a> {
    locale: &'a str,
    needs_pluralization: bool,
    ignore_missing: bool,
}

/// Translation context: catalogs, locale settings and plural rules.
#[derive(Debug, Default)]
pub struct I18n {
    catalog: Catalog,
    extras: Catalog,
    config: I18nConfig,
    plural_rules: HashMap<String, PluralRule>,
    metrics: TranslationMetrics,
}

impl I18n {
    /// Create a context over `catalog` with default settings.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Create a context over `catalog` with explicit settings.
    pub fn with_config(catalog: Catalog, config: I18nConfig) -> Self {
        Self {
            catalog,
            config,
            ..Self::default()
        }
    }

    /// Build a context from environment configuration.
    ///
    /// Loads the built-in catalog, then merges `catalog_path` and
    /// `extras_path` when set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut catalog = Catalog::builtin();
        if let Some(path) = &config.catalog_path {
            let bundle = Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog bundle {}", path))?;
            catalog.merge(bundle);
        }

        let mut i18n = Self::with_config(catalog, I18nConfig::from(config));

        let unregistered = i18n.config.unregistered_locales();
        if !unregistered.is_empty() {
            let enabled: Vec<&str> = LocaleRegistry::get()
                .list_enabled()
                .iter()
                .map(|locale| locale.code)
                .collect();
            warn!(
                "Locales {:?} are not registered (enabled: {}); using subtag plural rules",
                unregistered,
                enabled.join(", ")
            );
        }

        if let Some(path) = &config.extras_path {
            let extras = Catalog::from_path(path)
                .with_context(|| format!("Failed to load extras bundle {}", path))?;
            i18n.extras = extras;
        }

        Ok(i18n)
    }

    /// Replace the secondary catalog searched when the primary has no match.
    pub fn with_extras(mut self, extras: Catalog) -> Self {
        self.extras = extras;
        self
    }

    /// Merge an additional bundle into the primary catalog.
    pub fn load(&mut self, bundle: Catalog) {
        self.catalog.merge(bundle);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut I18nConfig {
        &mut self.config
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Set the active locale.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.config.locale = Some(locale.into());
    }

    /// The active locale, or the default locale when none is set.
    pub fn current_locale(&self) -> &str {
        self.config
            .locale
            .as_deref()
            .unwrap_or(&self.config.default_locale)
    }

    /// Override the plural rule for a locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules.insert(locale.into(), rule);
    }

    /// The plural rule applied to counts in `locale`.
    pub fn plural_rule(&self, locale: &str) -> PluralRule {
        self.plural_rules
            .get(locale)
            .copied()
            .unwrap_or_else(|| LocaleRegistry::get().plural_rule(locale))
    }

    // ==================== Lookup ====================

    /// Find the raw entry at `scope`.
    ///
    /// The path is `options.scope` + `scope`, with the `js` namespace
    /// prepended unless already present. When the primary catalog has no
    /// match and an extras catalog exists for the locale, the un-namespaced
    /// path is tried there. Falls back to `options.default_value`.
    ///
    /// # Returns
    /// * `Some(entry)` for a leaf string or a nested entry (e.g. plural forms)
    /// * `None` if nothing matched and no default was given
    pub fn lookup(&self, scope: &Scope, options: &Options) -> Option<Cow<'_, Entry>> {
        let locale = options.locale.as_deref().unwrap_or(self.current_locale());

        let path = match &options.scope {
            Some(prefix) => format!("{}{}{}", prefix, SEPARATOR, scope),
            None => scope.to_string(),
        };
        let original: Vec<&str> = path.split(SEPARATOR).collect();

        let mut segments = original.clone();
        if segments.first() != Some(&NAMESPACE) {
            segments.insert(0, NAMESPACE);
        }

        let found = self.catalog.descend(locale, &segments).or_else(|| {
            if self.extras.has_locale(locale) {
                self.extras.descend(locale, &original)
            } else {
                None
            }
        });

        match found {
            Some(entry) => Some(Cow::Borrowed(entry)),
            None => {
                debug!(locale, scope = %path, "Translation lookup missed");
                options
                    .default_value
                    .as_ref()
                    .map(|default| Cow::Owned(Entry::Text(default.clone())))
            }
        }
    }

    // ==================== Translate ====================

    /// Translate `scope`, walking the fallback chain and interpolating params.
    ///
    /// Order: requested locale, then (unless fallbacks are disabled) the
    /// fallback locale, the default locale and `en`. Only the first attempts
    /// tolerate a missing plural form; from the default locale on, a missing
    /// form renders as a placeholder and ends the chain.
    pub fn translate(&self, scope: &Scope, options: &Options) -> String {
        let options = prepare_options(&[options]);
        let (resolution, from_fallback) = self.resolve(scope, &options);

        let translation = match resolution {
            Some(Resolution::MissingForm(placeholder)) => {
                self.metrics.record_miss();
                return placeholder;
            }
            Some(Resolution::Found(entry)) => Some(entry),
            None => None,
        };

        match self.render(translation.as_deref(), &options) {
            Ok(rendered) => {
                if from_fallback {
                    self.metrics.record_fallback_hit();
                } else {
                    self.metrics.record_hit();
                }
                rendered
            }
            Err(InterpolationError::MissingTranslation) => {
                self.metrics.record_miss();
                self.missing_translation(scope, None)
            }
            Err(err) => {
                warn!(scope = %scope, error = %err, "Translation could not be rendered");
                self.metrics.record_interpolation_failure();
                self.missing_translation(scope, None)
            }
        }
    }

    /// Short-hand for [`I18n::translate`].
    pub fn t(&self, scope: impl Into<Scope>, options: &Options) -> String {
        self.translate(&scope.into(), options)
    }

    /// Walk the fallback chain for `scope`.
    ///
    /// # Returns
    /// The first non-blank resolution, and whether it came from a locale
    /// other than the requested one.
    fn resolve(&self, scope: &Scope, options: &Options) -> (Option<Resolution<'_>>, bool) {
        let requested = options
            .locale
            .clone()
            .unwrap_or_else(|| self.current_locale().to_string());

        let mut attempt = Attempt {
            locale: &requested,
            needs_pluralization: options.count.is_some(),
            ignore_missing: !self.config.no_fallbacks,
        };

        let mut resolution = self.find_translation(scope, options, &attempt);
        let mut from_fallback = false;

        if self.config.no_fallbacks {
            return (resolution, from_fallback);
        }

        let current = self.current_locale();

        if is_blank(&resolution) {
            if let Some(fallback) = &self.config.fallback_locale {
                debug!(scope = %scope, locale = %fallback, "Trying fallback locale");
                attempt.locale = fallback.as_str();
                resolution = self.find_translation(scope, options, &attempt);
                from_fallback = true;
            }
        }

        attempt.ignore_missing = false;

        if is_blank(&resolution) && current != self.config.default_locale {
            attempt.locale = self.config.default_locale.as_str();
            resolution = self.find_translation(scope, options, &attempt);
            from_fallback = true;
        }

        if is_blank(&resolution) && current != LAST_RESORT_LOCALE {
            attempt.locale = LAST_RESORT_LOCALE;
            resolution = self.find_translation(scope, options, &attempt);
            from_fallback = true;
        }

        (resolution, from_fallback)
    }

    fn find_translation<'a>(
        &'a self,
        scope: &Scope,
        options: &Options,
        attempt: &Attempt<'_>,
    ) -> Option<Resolution<'a>> {
        let mut options = options.clone();
        options.locale = Some(attempt.locale.to_string());

        let translation = self.lookup(scope, &options)?;
        if attempt.needs_pluralization {
            self.pluralize_entry(translation, scope, &options, attempt.ignore_missing)
        } else {
            Some(Resolution::Found(translation))
        }
    }

    fn render(&self, translation: Option<&Entry>, options: &Options) -> Result<String, InterpolationError> {
        match translation {
            Some(Entry::Text(message)) => interpolate(message, options),
            Some(Entry::Tree(_)) => Err(InterpolationError::NotAString),
            None => Err(InterpolationError::MissingTranslation),
        }
    }

    // ==================== Pluralize ====================

    /// Select the plural form of `translation` for `options.count`.
    ///
    /// Plain strings are returned unchanged. For plural nodes the locale's
    /// rule picks candidate categories and the first present one wins. When
    /// none is present the result is `[<locale>.<scope>.<category>]`, and a
    /// node without a count renders as `[<locale>.<scope>]`.
    pub fn pluralize(&self, translation: &Entry, scope: &Scope, options: &Options) -> String {
        match self.pluralize_entry(Cow::Borrowed(translation), scope, options, false) {
            Some(Resolution::Found(entry)) => match entry.as_ref() {
                Entry::Text(text) => text.clone(),
                Entry::Tree(_) => self.missing_translation(scope, None),
            },
            Some(Resolution::MissingForm(placeholder)) => placeholder,
            None => self.missing_translation(scope, None),
        }
    }

    /// Short-hand for [`I18n::pluralize`].
    pub fn p(&self, translation: &Entry, scope: impl Into<Scope>, options: &Options) -> String {
        self.pluralize(translation, &scope.into(), options)
    }

    fn pluralize_entry<'a>(
        &self,
        translation: Cow<'a, Entry>,
        scope: &Scope,
        options: &Options,
        ignore_missing: bool,
    ) -> Option<Resolution<'a>> {
        if matches!(translation.as_ref(), Entry::Text(_)) {
            return Some(Resolution::Found(translation));
        }

        let Some(count) = options.count else {
            debug!(scope = %scope, "Plural entry requested without a count");
            return if ignore_missing {
                None
            } else {
                Some(Resolution::MissingForm(self.missing_translation(scope, None)))
            };
        };

        let locale = options.locale.as_deref().unwrap_or(self.current_locale());
        let categories = self.plural_rule(locale).categorize(count);

        let selected = categories.iter().find_map(|category| {
            let child = translation.get(category.as_str())?;
            child.as_text().map(str::to_string)
        });

        match selected {
            Some(text) => Some(Resolution::Found(Cow::Owned(Entry::Text(text)))),
            None if ignore_missing => None,
            None => {
                let category = categories.first().map(|c| c.as_str());
                Some(Resolution::MissingForm(self.missing_translation(scope, category)))
            }
        }
    }

    // ==================== Missing Translation ====================

    /// Placeholder rendered for anything that could not be resolved.
    ///
    /// `[<locale>.<scope>]`, or `[<locale>.<scope>.<category>]` when a plural
    /// category was involved.
    pub fn missing_translation(&self, scope: &Scope, category: Option<&str>) -> String {
        let mut message = format!("[{}{}{}", self.current_locale(), SEPARATOR, scope);
        if let Some(category) = category {
            message.push_str(SEPARATOR);
            message.push_str(category);
        }
        message.push(']');
        message
    }

    // ==================== Numbers ====================

    fn catalog_format(&self, scope: &str) -> NumberFormat {
        self.lookup(&Scope::from(scope), &Options::new())
            .map(|entry| NumberFormat::from_entry(&entry))
            .unwrap_or_default()
    }

    /// Format `number` with the locale's separators.
    ///
    /// Layers: `format`, then the catalog's `number.format`, then defaults.
    pub fn to_number(&self, number: f64, format: &NumberFormat) -> String {
        let format = format.clone().or(&self.catalog_format("number.format"));
        format_number(number, &format)
    }

    /// Format a byte count as a human-readable size such as `1.5KB`.
    pub fn to_human_size(&self, bytes: f64, format: &NumberFormat) -> String {
        let (size, unit_key, precision) = scale_bytes(bytes);
        let unit_scope = Scope::from(format!("number.human.storage_units.units.{}", unit_key));

        let unit = if unit_key == "byte" {
            self.translate(&unit_scope, &Options::new().with_count(size))
        } else {
            self.translate(&unit_scope, &Options::new())
        };

        let format = format.clone().or(&NumberFormat::new()
            .with_precision(precision)
            .with_format("%n%u")
            .with_delimiter(""));
        let number = self.to_number(size, &format);

        apply_template(format.format.as_deref().unwrap_or("%n%u"), &number, &unit)
    }

    /// Format `number` as a percentage using `number.percentage.format`.
    pub fn to_percentage(&self, number: f64, format: &NumberFormat) -> String {
        let template = self
            .lookup(&Scope::from("number.percentage.format"), &Options::new())
            .and_then(|entry| entry.as_text().map(str::to_string));

        let mut defaults = NumberFormat::new().with_delimiter("");
        if let Some(template) = template {
            defaults = defaults.with_format(template);
        }

        let format = format.clone().or(&defaults);
        let number = self.to_number(number, &format);
        apply_template(format.format.as_deref().unwrap_or("%n%"), &number, "")
    }

    // ==================== Dates ====================

    /// Format a date with localized day, month and meridian names.
    pub fn strftime<D: Datelike + Timelike>(&self, date: &D, format: &str) -> String {
        strftime(date, format, |scope| self.t(scope, &Options::new()))
    }

    /// Format a date with the pattern stored at `scope` (e.g. `date.formats.long`).
    ///
    /// The pattern is resolved through the same fallback chain as
    /// [`I18n::translate`]. Without a pattern in any locale the result is the
    /// missing-translation placeholder.
    pub fn localize_date<D: Datelike + Timelike>(&self, scope: impl Into<Scope>, date: &D) -> String {
        let scope = scope.into();
        match self.resolve(&scope, &Options::new()).0 {
            Some(Resolution::Found(entry)) if !is_blank_entry(&entry) => match entry.as_ref() {
                Entry::Text(format) => self.strftime(date, format),
                Entry::Tree(_) => self.missing_translation(&scope, None),
            },
            _ => {
                self.metrics.record_miss();
                self.missing_translation(&scope, None)
            }
        }
    }

    // ==================== Coverage ====================

    /// Coverage of `locale` against the default locale.
    pub fn coverage(&self, locale: &str) -> CoverageReport {
        CoverageReport::compute(&self.catalog, locale, &self.config.default_locale)
    }
}

fn is_blank(resolution: &Option<Resolution<'_>>) -> bool {
    match resolution {
        None => true,
        Some(Resolution::Found(entry)) => is_blank_entry(entry),
        Some(Resolution::MissingForm(_)) => false,
    }
}

fn is_blank_entry(entry: &Entry) -> bool {
    matches!(entry, Entry::Text(text) if text.is_empty())
}
