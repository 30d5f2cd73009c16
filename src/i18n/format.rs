//! Number, percentage and byte-size formatting.
//!
//! Format settings are layered the same way as translation options: caller
//! settings first, then the locale's `number.*` catalog nodes, then built-in
//! defaults. The first layer that sets a field wins.

use crate::i18n::catalog::Entry;

/// Byte-size units above a single byte, indexed by the number of 1024 steps.
const STORAGE_UNITS: [&str; 5] = ["byte", "kb", "mb", "gb", "tb"];

/// Formatting settings. Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberFormat {
    pub precision: Option<usize>,
    pub separator: Option<String>,
    pub delimiter: Option<String>,
    pub strip_insignificant_zeros: Option<bool>,
    /// Output template; `%n` is the number and `%u` the unit.
    pub format: Option<String>,
}

impl NumberFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_strip_insignificant_zeros(mut self, strip: bool) -> Self {
        self.strip_insignificant_zeros = Some(strip);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Defaults applied after every other layer.
    pub fn defaults() -> Self {
        Self::new()
            .with_precision(3)
            .with_separator(".")
            .with_delimiter(",")
            .with_strip_insignificant_zeros(false)
    }

    /// Read settings from a catalog node such as `number.format`.
    ///
    /// Unparseable leaves are ignored.
    pub fn from_entry(entry: &Entry) -> Self {
        let text = |key: &str| entry.get(key).and_then(Entry::as_text);

        Self {
            precision: text("precision").and_then(|v| v.trim().parse().ok()),
            separator: text("separator").map(str::to_string),
            delimiter: text("delimiter").map(str::to_string),
            strip_insignificant_zeros: text("strip_insignificant_zeros")
                .and_then(|v| v.trim().parse().ok()),
            format: text("format").map(str::to_string),
        }
    }

    /// Fill unset fields from `fallback`.
    pub fn or(mut self, fallback: &NumberFormat) -> Self {
        if self.precision.is_none() {
            self.precision = fallback.precision;
        }
        if self.separator.is_none() {
            self.separator.clone_from(&fallback.separator);
        }
        if self.delimiter.is_none() {
            self.delimiter.clone_from(&fallback.delimiter);
        }
        if self.strip_insignificant_zeros.is_none() {
            self.strip_insignificant_zeros = fallback.strip_insignificant_zeros;
        }
        if self.format.is_none() {
            self.format.clone_from(&fallback.format);
        }
        self
    }
}

/// Format `number` with thousands grouping and fixed precision.
///
/// Unset fields use [`NumberFormat::defaults`].
pub fn format_number(number: f64, format: &NumberFormat) -> String {
    let format = format.clone().or(&NumberFormat::defaults());
    let precision = format.precision.unwrap_or(3);
    let separator = format.separator.as_deref().unwrap_or(".");
    let delimiter = format.delimiter.as_deref().unwrap_or(",");

    let fixed = format!("{:.*}", precision, number.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut formatted = group_thousands(integer, delimiter);
    if precision > 0 {
        formatted.push_str(separator);
        formatted.push_str(fraction);
    }

    if format.strip_insignificant_zeros.unwrap_or(false) && precision > 0 {
        let trimmed = formatted.trim_end_matches('0');
        formatted = trimmed
            .strip_suffix(separator)
            .unwrap_or(trimmed)
            .to_string();
    }

    if number < 0.0 {
        formatted.insert(0, '-');
    }
    formatted
}

fn group_thousands(digits: &str, delimiter: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * delimiter.len());

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(delimiter);
        }
        grouped.push(digit);
    }
    grouped
}

/// Scale a byte count through byte/KB/MB/GB/TB.
///
/// # Returns
/// The scaled value, the unit key (`"byte"`, `"kb"`, ...), and the precision
/// to display it with: 0 for bytes and whole values, 1 otherwise.
pub fn scale_bytes(bytes: f64) -> (f64, &'static str, usize) {
    let mut size = bytes;
    let mut steps = 0;

    while size >= 1024.0 && steps < STORAGE_UNITS.len() - 1 {
        size /= 1024.0;
        steps += 1;
    }

    let precision = if steps == 0 || size.fract() == 0.0 { 0 } else { 1 };
    (size, STORAGE_UNITS[steps], precision)
}

/// Render a `%n`/`%u` template. Each token is replaced once.
pub fn apply_template(template: &str, number: &str, unit: &str) -> String {
    template.replacen("%u", unit, 1).replacen("%n", number, 1)
}
