//! Placeholder substitution for `{{name}}` and `%{name}` tokens.

use crate::i18n::options::{Options, ParamValue};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Reasons a translation could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("no translation found")]
    MissingTranslation,

    #[error("translation is a nested entry, not a string")]
    NotAString,

    #[error("placeholder {placeholder} cannot render value {value}")]
    UnsupportedValue { placeholder: String, value: String },
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"(?:\{\{|%\{)(.*?)(?:\}\}?)").unwrap())
}

/// Marker rendered in place of a placeholder without a value.
pub fn missing_placeholder(placeholder: &str) -> String {
    format!("[missing {} value]", placeholder)
}

/// Names of every placeholder in `message`, in order of appearance.
pub fn placeholder_names(message: &str) -> Vec<&str> {
    placeholder_regex()
        .captures_iter(message)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .collect()
}

/// Substitute every placeholder in `message` with its param from `options`.
///
/// Occurrences are resolved left to right and independently, so a name used
/// twice is substituted twice. Values are inserted verbatim and are never
/// re-scanned for placeholders. A missing or `null` param renders as
/// `[missing {{name}} value]`.
///
/// # Errors
/// Returns `UnsupportedValue` when a param is an array or object.
pub fn interpolate(message: &str, options: &Options) -> Result<String, InterpolationError> {
    let regex = placeholder_regex();
    if !regex.is_match(message) {
        return Ok(message.to_string());
    }

    let mut rendered = String::with_capacity(message.len());
    let mut last = 0;

    for captures in regex.captures_iter(message) {
        let Some(token) = captures.get(0) else {
            continue;
        };
        let name = captures.get(1).map_or("", |m| m.as_str());

        rendered.push_str(&message[last..token.start()]);
        rendered.push_str(&render_param(token.as_str(), name, options)?);
        last = token.end();
    }

    rendered.push_str(&message[last..]);
    Ok(rendered)
}

fn render_param(
    placeholder: &str,
    name: &str,
    options: &Options,
) -> Result<String, InterpolationError> {
    match options.param(name) {
        None => Ok(missing_placeholder(placeholder)),
        Some(ParamValue::Count(count)) => Ok(count.to_string()),
        Some(ParamValue::Json(value)) => match value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(match number.as_f64() {
                Some(float) if number.is_f64() => float.to_string(),
                _ => number.to_string(),
            }),
            Value::Bool(flag) => Ok(flag.to_string()),
            Value::Null => Ok(missing_placeholder(placeholder)),
            Value::Array(_) | Value::Object(_) => Err(InterpolationError::UnsupportedValue {
                placeholder: placeholder.to_string(),
                value: value.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // ==================== Substitution Tests ====================

    #[test]
    fn test_interpolate_double_brace() {
        let options = Options::new().with_param("name", "Ona");
        assert_eq!(interpolate("Hi {{name}}", &options).unwrap(), "Hi Ona");
    }

    #[test]
    fn test_interpolate_percent_brace() {
        let options = Options::new().with_param("name", "Ona");
        assert_eq!(interpolate("Hi %{name}!", &options).unwrap(), "Hi Ona!");
    }

    #[test]
    fn test_interpolate_missing_param() {
        assert_eq!(
            interpolate("Hi {{name}}", &Options::new()).unwrap(),
            "Hi [missing {{name}} value]"
        );
        assert_eq!(
            interpolate("Hi %{name}", &Options::new()).unwrap(),
            "Hi [missing %{name} value]"
        );
    }

    #[test]
    fn test_interpolate_null_param_is_missing() {
        let options = Options::new().with_param("name", Value::Null);
        assert_eq!(
            interpolate("{{name}}", &options).unwrap(),
            "[missing {{name}} value]"
        );
    }

    #[test]
    fn test_interpolate_percent_in_value() {
        let options = Options::new().with_param("X", "100% off");
        assert_eq!(interpolate("Save {{X}}!", &options).unwrap(), "Save 100% off!");
    }

    #[test]
    fn test_interpolate_dollar_in_value_is_literal() {
        let options = Options::new().with_param("price", "$1 or $$2 or $0");
        assert_eq!(
            interpolate("Only {{price}}", &options).unwrap(),
            "Only $1 or $$2 or $0"
        );
    }

    #[test]
    fn test_interpolate_repeated_placeholder() {
        let options = Options::new().with_param("n", "7");
        assert_eq!(
            interpolate("{{n}} + {{n}} = 2 x {{n}}", &options).unwrap(),
            "7 + 7 = 2 x 7"
        );
    }

    #[test]
    fn test_interpolate_value_is_not_rescanned() {
        let options = Options::new()
            .with_param("a", "{{b}}")
            .with_param("b", "B");
        assert_eq!(interpolate("{{a}} {{b}}", &options).unwrap(), "{{b}} B");
    }

    #[test]
    fn test_interpolate_numbers_and_bools() {
        let options = Options::new()
            .with_param("int", 5)
            .with_param("float", 1.5)
            .with_param("whole", 2.0)
            .with_param("flag", true);
        assert_eq!(
            interpolate("{{int}} {{float}} {{whole}} {{flag}}", &options).unwrap(),
            "5 1.5 2 true"
        );
    }

    #[test]
    fn test_interpolate_count_option() {
        let options = Options::new().with_count(21.0);
        assert_eq!(
            interpolate("%{count} atsakymas", &options).unwrap(),
            "21 atsakymas"
        );
    }

    #[test]
    fn test_interpolate_unsupported_value() {
        let options = Options::new().with_param("list", json!([1, 2]));
        let err = interpolate("{{list}}", &options).unwrap_err();
        assert_eq!(
            err,
            InterpolationError::UnsupportedValue {
                placeholder: "{{list}}".to_string(),
                value: "[1,2]".to_string(),
            }
        );
    }

    #[test]
    fn test_interpolate_unterminated_token_is_left_alone() {
        let options = Options::new().with_param("name", "Ona");
        assert_eq!(interpolate("Hi {{name", &options).unwrap(), "Hi {{name");
    }

    // ==================== placeholder_names Tests ====================

    #[test]
    fn test_placeholder_names() {
        assert_eq!(
            placeholder_names("%{count} of {{total}} by {{user}}"),
            vec!["count", "total", "user"]
        );
        assert!(placeholder_names("plain").is_empty());
    }

    proptest! {
        #[test]
        fn interpolate_without_placeholders_is_identity(s in "[^{}%]*") {
            let options = Options::new().with_param("name", "ignored");
            prop_assert_eq!(interpolate(&s, &options).unwrap(), s);
        }
    }
}
