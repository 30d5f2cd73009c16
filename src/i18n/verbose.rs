//! Verbose localization: a translator decorator that numbers every distinct
//! key, logs it once, and tags each rendered string with ` (#N)`.
//!
//! The flag can be persisted in a session store so the mode survives a
//! reload, mirroring a browser's session storage.

use crate::config::Config;
use crate::i18n::metrics::TranslationMetrics;
use crate::i18n::options::{Options, Scope};
use crate::i18n::translator::I18n;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Session key holding the verbose flag.
pub const VERBOSE_SESSION_KEY: &str = "verbose_localization";

/// Notice returned when verbose mode is enabled for the session.
pub const VERBOSE_ENABLED_NOTICE: &str = "Verbose localization is enabled. Close the browser tab to turn it off. Reload the page to see the translation keys.";

/// Anything that can turn a scope and options into display text.
pub trait Translate {
    fn translate(&self, scope: &Scope, options: &Options) -> String;

    /// Short-hand for [`Translate::translate`] with a plain string scope.
    fn t(&self, scope: &str, options: &Options) -> String {
        self.translate(&Scope::from(scope), options)
    }

    /// Counters of the underlying context, if it keeps any.
    fn metrics(&self) -> Option<&TranslationMetrics> {
        None
    }
}

impl Translate for I18n {
    fn translate(&self, scope: &Scope, options: &Options) -> String {
        I18n::translate(self, scope, options)
    }

    fn metrics(&self) -> Option<&TranslationMetrics> {
        Some(I18n::metrics(self))
    }
}

impl<T: Translate + ?Sized> Translate for Box<T> {
    fn translate(&self, scope: &Scope, options: &Options) -> String {
        (**self).translate(scope, options)
    }

    fn metrics(&self) -> Option<&TranslationMetrics> {
        (**self).metrics()
    }
}

/// Decorator that numbers and logs each distinct key it translates.
pub struct VerboseTranslator<T> {
    inner: T,
    keys: Mutex<HashMap<String, usize>>,
}

impl<T: Translate> VerboseTranslator<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped translator.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Number of distinct keys seen so far.
    pub fn distinct_keys(&self) -> usize {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn key_id(&self, scope: &Scope, options: &Options) -> usize {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = keys.get(scope.as_str()) {
            return *id;
        }

        let id = keys.len() + 1;
        keys.insert(scope.to_string(), id);

        info!("{}", describe(id, scope, options));
        id
    }
}

/// Log line for a newly numbered key: `Translation #N: scope`, followed by
/// `, parameters: <json>` when any option is set.
fn describe(id: usize, scope: &Scope, options: &Options) -> String {
    if options.is_empty() {
        format!("Translation #{}: {}", id, scope)
    } else {
        let parameters = serde_json::to_string(options).unwrap_or_default();
        format!("Translation #{}: {}, parameters: {}", id, scope, parameters)
    }
}

impl<T: Translate> Translate for VerboseTranslator<T> {
    fn translate(&self, scope: &Scope, options: &Options) -> String {
        let id = self.key_id(scope, options);
        format!("{} (#{})", self.inner.translate(scope, options), id)
    }

    fn metrics(&self) -> Option<&TranslationMetrics> {
        self.inner.metrics()
    }
}

impl I18n {
    /// Wrap this context in a [`VerboseTranslator`].
    ///
    /// Fallbacks are disabled so every missing key shows up in place.
    pub fn into_verbose(mut self) -> VerboseTranslator<I18n> {
        self.config_mut().no_fallbacks = true;
        VerboseTranslator::new(self)
    }
}

/// String key/value storage scoped to a session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Session store that lives only as long as the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Session store persisted as a JSON object in a file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid session file {}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                warn!("Ignoring unreadable session store: {:#}", e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }
}

/// Persist the verbose flag for this session.
///
/// # Returns
/// The notice to show the developer.
pub fn enable_verbose_localization_session(store: &mut dyn SessionStore) -> Result<&'static str> {
    store.set(VERBOSE_SESSION_KEY, "true")?;
    Ok(VERBOSE_ENABLED_NOTICE)
}

/// Whether the verbose flag is set for this session.
pub fn is_verbose_session(store: &dyn SessionStore) -> bool {
    store.get(VERBOSE_SESSION_KEY).as_deref() == Some("true")
}

/// Build the translator described by `config`.
///
/// Verbose mode is on when `VERBOSE_LOCALIZATION` is set or the session file
/// carries the verbose flag.
pub fn translator_from_config(config: &Config) -> Result<Box<dyn Translate>> {
    let i18n = I18n::from_config(config)?;

    let session_verbose = config
        .session_file
        .as_ref()
        .map(|path| is_verbose_session(&FileSessionStore::new(path)))
        .unwrap_or(false);

    if config.verbose_localization || session_verbose {
        info!("Verbose localization enabled");
        Ok(Box::new(i18n.into_verbose()))
    } else {
        Ok(Box::new(i18n))
    }
}
