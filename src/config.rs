use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Locales
    pub locale: Option<String>,
    pub default_locale: String,
    pub fallback_locale: Option<String>,
    pub no_fallbacks: bool,

    // Debugging
    pub verbose_localization: bool,
    pub session_file: Option<String>,

    // Catalog bundles
    pub catalog_path: Option<String>,
    pub extras_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Locales
            locale: optional_env("LOCALE"),
            default_locale: optional_env("DEFAULT_LOCALE").unwrap_or_else(|| "en".to_string()),
            fallback_locale: optional_env("FALLBACK_LOCALE"),
            no_fallbacks: bool_env("NO_FALLBACKS")?,

            // Debugging
            verbose_localization: bool_env("VERBOSE_LOCALIZATION")?,
            session_file: optional_env("SESSION_FILE"),

            // Catalog bundles
            catalog_path: optional_env("CATALOG_PATH"),
            extras_path: optional_env("EXTRAS_PATH"),
        })
    }
}

/// Read a variable, treating unset and empty as absent.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a boolean flag; unset means `false`.
fn bool_env(name: &str) -> Result<bool> {
    match optional_env(name).as_deref() {
        None => Ok(false),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("FALSE") | Some("no") => Ok(false),
        Some(other) => bail!("{} must be true or false, got '{}'", name, other),
    }
}
