//! Locale registry: metadata for every locale this bundle knows about.
//!
//! The registry is a process-wide, immutable table initialized once on first
//! access with `OnceLock`. It never holds mutable configuration; the active
//! and fallback locales live in each `I18n` context instead.

use crate::i18n::plural::PluralRule;
use std::fmt;
use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Catalog code (e.g. "en", "lt", "zh_CN")
    pub code: &'static str,

    /// English name of the locale (e.g. "Lithuanian")
    pub name: &'static str,

    /// Native name of the locale (e.g. "Lietuvių")
    pub native_name: &'static str,

    /// Plural rule used for `count`-driven lookups
    pub plural_rule: PluralRule,

    /// Whether this is the default locale (only one should be true)
    pub is_default: bool,

    /// Whether this locale is enabled for use
    pub enabled: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if zero or several locales are marked as default (this
    /// indicates a configuration error in `default_locales`).
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check if a locale code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }

    /// Plural rule for a locale code.
    ///
    /// Registered locales use their configured rule; anything else is
    /// resolved by language subtag.
    pub fn plural_rule(&self, code: &str) -> PluralRule {
        self.get_by_code(code)
            .map(|locale| locale.plural_rule)
            .unwrap_or_else(|| PluralRule::for_locale(code))
    }
}

/// A locale code known to be registered and enabled.
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    config: &'static LocaleConfig,
}

impl Locale {
    /// Look up an enabled locale by code.
    ///
    /// # Returns
    /// * `Some(Locale)` if the code is registered and enabled
    /// * `None` otherwise
    pub fn from_code(code: &str) -> Option<Locale> {
        LocaleRegistry::get()
            .get_by_code(code)
            .filter(|config| config.enabled)
            .map(|config| Locale { config })
    }

    /// The registry's default locale.
    pub fn default_locale() -> Locale {
        Locale {
            config: LocaleRegistry::get().default_locale(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.config.code
    }

    pub fn config(&self) -> &'static LocaleConfig {
        self.config
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.config.plural_rule
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Locale {}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Locales shipped in this bundle: the page locale plus English and
/// Chinese fallback data.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            plural_rule: PluralRule::English,
            is_default: true,
            enabled: true,
        },
        LocaleConfig {
            code: "lt",
            name: "Lithuanian",
            native_name: "Lietuvių",
            plural_rule: PluralRule::Lithuanian,
            is_default: false,
            enabled: true,
        },
        LocaleConfig {
            code: "zh_CN",
            name: "Chinese (Simplified)",
            native_name: "简体中文",
            plural_rule: PluralRule::Chinese,
            is_default: false,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::plural::PluralCategory;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_lithuanian() {
        let config = LocaleRegistry::get()
            .get_by_code("lt")
            .expect("Lithuanian should be registered");

        assert_eq!(config.name, "Lithuanian");
        assert_eq!(config.native_name, "Lietuvių");
        assert!(!config.is_default);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("fr").is_none());
    }

    #[test]
    fn test_list_enabled() {
        let enabled = LocaleRegistry::get().list_enabled();

        assert_eq!(enabled.len(), 3);
        assert!(enabled.iter().any(|locale| locale.code == "en"));
        assert!(enabled.iter().any(|locale| locale.code == "lt"));
        assert!(enabled.iter().any(|locale| locale.code == "zh_CN"));
    }

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(LocaleRegistry::get().default_locale().code, "en");
    }

    #[test]
    fn test_is_enabled() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_enabled("lt"));
        assert!(!registry.is_enabled("fr"));
    }

    // ==================== Locale Tests ====================

    #[test]
    fn test_locale_from_code() {
        let locale = Locale::from_code("lt").expect("Lithuanian should be enabled");
        assert_eq!(locale.code(), "lt");
        assert_eq!(locale.config().native_name, "Lietuvių");
        assert_eq!(locale.plural_rule().categorize(21.0), vec![PluralCategory::One]);
        assert_eq!(locale.to_string(), "lt");
    }

    #[test]
    fn test_locale_from_unknown_code() {
        assert!(Locale::from_code("fr").is_none());
        assert!(Locale::from_code("LT").is_none());
    }

    #[test]
    fn test_locale_default() {
        assert_eq!(Locale::default_locale(), Locale::from_code("en").unwrap());
    }

    #[test]
    fn test_plural_rule_registered_and_unregistered() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.plural_rule("lt").categorize(2.0), vec![PluralCategory::Few]);
        // Unregistered locale resolved by subtag
        assert_eq!(registry.plural_rule("lt-LT").categorize(2.0), vec![PluralCategory::Few]);
        assert_eq!(registry.plural_rule("fr").categorize(2.0), vec![PluralCategory::Other]);
    }
}
