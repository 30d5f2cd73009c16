//! Lookup scopes and the option bag passed to every translation call.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Separator between scope segments.
pub const SEPARATOR: &str = ".";

/// A dotted key path, built from a string or from ordered segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    path: String,
}

impl Scope {
    /// Build a scope from segments, joining them with `.`.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let path = segments
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        Self { path }
    }

    /// The dotted path.
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for Scope {
    fn from(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl From<String> for Scope {
    fn from(path: String) -> Self {
        Self { path }
    }
}

impl From<&String> for Scope {
    fn from(path: &String) -> Self {
        Self { path: path.clone() }
    }
}

impl From<&[&str]> for Scope {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments)
    }
}

impl<const N: usize> From<[&str; N]> for Scope {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(&segments)
    }
}

impl From<Vec<String>> for Scope {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(&segments)
    }
}

/// Options recognized by lookup and translate, plus interpolation params.
///
/// Unset fields are `None`; a param holding JSON `null` is treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Locale to use instead of the active one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Prefix prepended to the requested scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Returned by lookup when the key is not found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Triggers pluralization and is available as the `count` param.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,

    /// Named interpolation params.
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl Options {
    /// Create an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_count(mut self, count: f64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Whether no option or param is set.
    pub fn is_empty(&self) -> bool {
        self.locale.is_none()
            && self.scope.is_none()
            && self.default_value.is_none()
            && self.count.is_none()
            && self.params.values().all(Value::is_null)
    }

    /// The value of a named param, if set.
    ///
    /// `count` resolves to the `count` option when no param of that name exists.
    pub(crate) fn param(&self, name: &str) -> Option<ParamValue<'_>> {
        match self.params.get(name) {
            Some(Value::Null) | None => match (name, self.count) {
                ("count", Some(count)) => Some(ParamValue::Count(count)),
                _ => None,
            },
            Some(value) => Some(ParamValue::Json(value)),
        }
    }
}

/// A resolved interpolation param.
pub(crate) enum ParamValue<'a> {
    Count(f64),
    Json(&'a Value),
}

/// Merge option bags left to right. The first set value for a key wins.
///
/// ```ignore
/// let merged = prepare_options(&[&Options::new().with_param("a", 1),
///                                 &Options::new().with_param("a", 2).with_param("b", 3)]);
/// // merged.params == {a: 1, b: 3}
/// ```
pub fn prepare_options(sources: &[&Options]) -> Options {
    let mut merged = Options::new();

    for source in sources {
        if merged.locale.is_none() {
            merged.locale.clone_from(&source.locale);
        }
        if merged.scope.is_none() {
            merged.scope.clone_from(&source.scope);
        }
        if merged.default_value.is_none() {
            merged.default_value.clone_from(&source.default_value);
        }
        if merged.count.is_none() {
            merged.count = source.count;
        }
        for (name, value) in &source.params {
            let unset = merged.params.get(name).map_or(true, Value::is_null);
            if unset {
                merged.params.insert(name.clone(), value.clone());
            }
        }
    }

    merged
}
