use serde::{Deserialize, Serialize};

/// Empirically tuned completeness thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Minimum share of passed checks for a page to count as complete.
    pub pass_ratio: f64,
    /// Share of the expected item count each marker must reach.
    pub count_ratio: f64,
    /// Marker counts must differ by less than this.
    pub marker_spread_limit: u32,
    /// Minimum document length in bytes.
    pub min_length: usize,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            pass_ratio: 0.95,
            count_ratio: 0.8,
            marker_spread_limit: 2,
            min_length: 1000,
        }
    }
}

impl ValidationThresholds {
    pub fn min_expected(&self, expected_count: u32) -> u32 {
        let scaled = (f64::from(expected_count) * self.count_ratio).floor();
        (scaled as u32).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructuralFindings {
    pub has_document_open: bool,
    pub has_document_close: bool,
    pub has_style_block: bool,
    pub has_content_container: bool,
    pub length: usize,
}

/// Per-item marker occurrences found in a candidate page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerCounts {
    pub cards: u32,
    pub titles: u32,
    pub images: u32,
}

impl MarkerCounts {
    pub fn spread(&self) -> u32 {
        let values = [self.cards, self.titles, self.images];
        let max = values.iter().copied().max().unwrap_or(0);
        let min = values.iter().copied().min().unwrap_or(0);
        max - min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub complete: bool,
    pub pass_ratio: f64,
    pub failed_checks: Vec<&'static str>,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        if self.failed_checks.is_empty() {
            format!("all checks passed ({:.2})", self.pass_ratio)
        } else {
            format!(
                "pass ratio {:.2}, failed: {}",
                self.pass_ratio,
                self.failed_checks.join(", ")
            )
        }
    }
}

/// Scores a page from its structural findings and marker counts.
///
/// Quantitative checks only apply when `expected_count > 0`.
pub fn evaluate(
    structure: &StructuralFindings,
    counts: &MarkerCounts,
    expected_count: u32,
    thresholds: &ValidationThresholds,
) -> ValidationResult {
    let mut checks: Vec<(&'static str, bool)> = vec![
        ("document-open", structure.has_document_open),
        ("document-close", structure.has_document_close),
        ("style-block", structure.has_style_block),
        ("content-container", structure.has_content_container),
        ("min-length", structure.length >= thresholds.min_length),
    ];

    if expected_count > 0 {
        let min_expected = thresholds.min_expected(expected_count);
        checks.push(("card-count", counts.cards >= min_expected));
        checks.push(("title-count", counts.titles >= min_expected));
        checks.push(("image-count", counts.images >= min_expected));
        checks.push((
            "marker-spread",
            counts.spread() < thresholds.marker_spread_limit,
        ));
    }

    let total = checks.len();
    let failed_checks: Vec<&'static str> = checks
        .iter()
        .filter(|(_, passed)| !passed)
        .map(|(name, _)| *name)
        .collect();
    let passed = total - failed_checks.len();
    let pass_ratio = passed as f64 / total as f64;

    ValidationResult {
        complete: pass_ratio >= thresholds.pass_ratio,
        pass_ratio,
        failed_checks,
    }
}
