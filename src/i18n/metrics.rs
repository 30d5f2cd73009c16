//! Translation observability: lookup counters and catalog coverage.

use crate::i18n::catalog::Catalog;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for translate calls made through one `I18n` context.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Keys resolved in the requested locale
    hits: AtomicUsize,

    /// Keys resolved only after walking the fallback chain
    fallback_hits: AtomicUsize,

    /// Keys that rendered as a missing-translation placeholder
    misses: AtomicUsize,

    /// Translations whose interpolation failed
    interpolation_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_interpolation_failure(&self) {
        self.interpolation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn interpolation_failures(&self) -> usize {
        self.interpolation_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallback_hits = self.fallback_hits();
        let misses = self.misses();
        let interpolation_failures = self.interpolation_failures();
        let total = hits + fallback_hits + misses + interpolation_failures;

        let hit_rate = if total > 0 {
            ((hits + fallback_hits) as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            hits,
            fallback_hits,
            misses,
            interpolation_failures,
            hit_rate,
        }
    }

    /// Reset all counters to zero (for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.fallback_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.interpolation_failures.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of translation counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub total: usize,
    pub hits: usize,
    pub fallback_hits: usize,
    pub misses: usize,
    pub interpolation_failures: usize,

    /// Resolved translations as a percentage of all calls (0-100)
    pub hit_rate: f64,
}

/// How much of a reference locale a target locale translates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub locale: String,
    pub reference_locale: String,
    pub total_keys: usize,
    pub translated_keys: usize,

    /// Reference keys absent from the target locale
    pub missing_keys: Vec<String>,

    /// Percentage of reference keys present (0-100)
    pub coverage: f64,
}

impl CoverageReport {
    /// Compare the leaf keys of `locale` against `reference_locale`.
    pub fn compute(catalog: &Catalog, locale: &str, reference_locale: &str) -> Self {
        let target: HashSet<String> = catalog.keys(locale).into_iter().collect();
        let reference = catalog.keys(reference_locale);

        let missing_keys: Vec<String> = reference
            .iter()
            .filter(|key| !target.contains(*key))
            .cloned()
            .collect();

        let total_keys = reference.len();
        let translated_keys = total_keys - missing_keys.len();
        let coverage = if total_keys > 0 {
            (translated_keys as f64 / total_keys as f64) * 100.0
        } else {
            100.0
        };

        Self {
            locale: locale.to_string(),
            reference_locale: reference_locale.to_string(),
            total_keys,
            translated_keys,
            missing_keys,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_counters() {
        let metrics = TranslationMetrics::new();

        metrics.record_hit();
        metrics.record_hit();
        metrics.record_fallback_hit();
        metrics.record_miss();
        metrics.record_interpolation_failure();

        assert_eq!(metrics.hits(), 2);
        assert_eq!(metrics.fallback_hits(), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.interpolation_failures(), 1);
    }

    #[test]
    fn test_reset() {
        let metrics = TranslationMetrics::new();
        metrics.record_hit();
        metrics.record_miss();
        metrics.reset();

        assert_eq!(metrics.report().total, 0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = TranslationMetrics::new().report();
        assert_eq!(report.total, 0);
        assert_eq!(report.hit_rate, 0.0);
    }

    #[test]
    fn test_report_hit_rate() {
        let metrics = TranslationMetrics::new();
        metrics.record_hit();
        metrics.record_fallback_hit();
        metrics.record_hit();
        metrics.record_miss();

        let report = metrics.report();
        assert_eq!(report.total, 4);
        assert_eq!(report.hit_rate, 75.0);
    }

    #[test]
    fn test_report_serialization() {
        let metrics = TranslationMetrics::new();
        metrics.record_hit();

        let json = serde_json::to_string(&metrics.report()).expect("Should serialize");
        assert!(json.contains("\"hits\":1"));
        assert!(json.contains("\"hit_rate\":100.0"));
    }

    // ==================== Coverage Tests ====================

    #[test]
    fn test_coverage_partial() {
        let catalog = Catalog::from_json_str(
            r#"{
                "en": {"js": {"a": "A", "b": "B", "c": {"one": "C", "other": "Cs"}}},
                "lt": {"js": {"a": "A", "c": {"one": "C"}}}
            }"#,
        )
        .unwrap();

        let report = CoverageReport::compute(&catalog, "lt", "en");

        assert_eq!(report.total_keys, 4);
        assert_eq!(report.translated_keys, 2);
        assert_eq!(report.missing_keys, vec!["js.b", "js.c.other"]);
        assert_eq!(report.coverage, 50.0);
    }

    #[test]
    fn test_coverage_empty_reference() {
        let report = CoverageReport::compute(&Catalog::new(), "lt", "en");
        assert_eq!(report.total_keys, 0);
        assert_eq!(report.coverage, 100.0);
    }

    #[test]
    fn test_builtin_lithuanian_covers_english() {
        let catalog = Catalog::builtin();
        let report = CoverageReport::compute(&catalog, "lt", "en");
        assert!(report.missing_keys.is_empty(), "{:?}", report.missing_keys);
    }

    #[test]
    fn test_builtin_chinese_has_no_singular_byte_unit() {
        let catalog = Catalog::builtin();
        let report = CoverageReport::compute(&catalog, "zh_CN", "en");
        assert_eq!(
            report.missing_keys,
            vec!["js.number.human.storage_units.units.byte.one"]
        );
    }
}
