//! Translation quality validation.
//!
//! Checks that translated strings keep the placeholders of the reference
//! locale, so interpolation never renders a `[missing ... value]` marker
//! that the reference string would not.

use crate::i18n::catalog::{Catalog, Entry};
use crate::i18n::interpolate::placeholder_names;
use crate::i18n::plural::PluralCategory;
use std::collections::BTreeSet;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    fn extend(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

impl TranslationValidator {
    /// Validate that `translated` uses the same placeholders as `reference`.
    ///
    /// A placeholder the translation drops is an error; a placeholder it
    /// adds is a warning (it renders as a missing-value marker unless the
    /// caller happens to pass it).
    pub fn validate(reference: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let expected: BTreeSet<&str> = placeholder_names(reference).into_iter().collect();
        let actual: BTreeSet<&str> = placeholder_names(translated).into_iter().collect();

        let dropped: Vec<_> = expected.difference(&actual).collect();
        if !dropped.is_empty() {
            report.errors.push(format!(
                "Placeholder mismatch: translation drops {:?}",
                dropped
            ));
        }

        let added: Vec<_> = actual.difference(&expected).collect();
        if !added.is_empty() {
            report.warnings.push(format!(
                "Placeholder mismatch: translation adds {:?}",
                added
            ));
        }

        report
    }

    /// Validate every leaf `locale` shares with `reference_locale`.
    ///
    /// Plural forms are compared against the reference `other` form, since
    /// locales differ in which categories they define. Plural nodes without
    /// an `other` form are reported as warnings.
    pub fn validate_catalog(
        catalog: &Catalog,
        locale: &str,
        reference_locale: &str,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let (Some(target), Some(reference)) =
            (catalog.locale(locale), catalog.locale(reference_locale))
        else {
            return report;
        };

        Self::walk(target, reference, locale, "", &mut report);
        report
    }

    fn walk(target: &Entry, reference: &Entry, locale: &str, path: &str, report: &mut ValidationReport) {
        match (target, reference) {
            (Entry::Text(translated), Entry::Text(original)) => {
                report.extend(Self::prefixed(locale, path, Self::validate(original, translated)));
            }
            (Entry::Tree(children), Entry::Tree(_)) if is_plural_node(target) => {
                if !children.contains_key(PluralCategory::Other.as_str()) {
                    report
                        .warnings
                        .push(format!("{}.{}: plural entry has no 'other' form", locale, path));
                }

                let original = reference
                    .get(PluralCategory::Other.as_str())
                    .and_then(Entry::as_text);
                if let Some(original) = original {
                    for (category, form) in children {
                        if let Some(translated) = form.as_text() {
                            let report_path = format!("{}.{}", path, category);
                            report.extend(Self::prefixed(
                                locale,
                                &report_path,
                                Self::validate(original, translated),
                            ));
                        }
                    }
                }
            }
            (Entry::Tree(children), Entry::Tree(_)) => {
                for (key, child) in children {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    if let Some(original) = reference.get(key) {
                        Self::walk(child, original, locale, &child_path, report);
                    }
                }
            }
            _ => report.warnings.push(format!(
                "{}.{}: shape differs from the reference locale",
                locale, path
            )),
        }
    }

    fn prefixed(locale: &str, path: &str, report: ValidationReport) -> ValidationReport {
        let prefix = |message: String| format!("{}.{}: {}", locale, path, message);
        ValidationReport {
            errors: report.errors.into_iter().map(prefix).collect(),
            warnings: report.warnings.into_iter().map(prefix).collect(),
        }
    }
}

/// A tree whose keys are all plural category names.
fn is_plural_node(entry: &Entry) -> bool {
    match entry {
        Entry::Tree(children) => {
            !children.is_empty()
                && children
                    .keys()
                    .all(|key| key.parse::<PluralCategory>().is_ok())
        }
        Entry::Text(_) => false,
    }
}
