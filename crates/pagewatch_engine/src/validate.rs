use pagewatch_core::{
    evaluate, MarkerCounts, StructuralFindings, ValidationResult, ValidationThresholds,
};
use scraper::{Html, Selector};

const CARD_SELECTOR: &str = ".note-card";
const TITLE_SELECTOR: &str = ".note-title";
const IMAGE_SELECTOR: &str = ".note-image";
const CONTAINER_SELECTOR: &str = ".results-grid, .notes-container, .container";

/// Decides whether a fetched result page is complete, not merely reachable.
///
/// Holds no per-page state: every call re-parses the content it is given.
#[derive(Debug, Clone, Default)]
pub struct ContentValidator {
    thresholds: ValidationThresholds,
}

impl ContentValidator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn validate(&self, html: &str, expected_count: u32) -> ValidationResult {
        let doc = Html::parse_document(html);
        let structure = structural_findings(html, &doc);
        let counts = marker_counts(&doc);
        evaluate(&structure, &counts, expected_count, &self.thresholds)
    }
}

fn structural_findings(html: &str, doc: &Html) -> StructuralFindings {
    // Open/close markers are checked on the raw text; the parser would
    // synthesize missing tags for a half-written page.
    let lowered = html.to_ascii_lowercase();
    let head = lowered.trim_start();
    StructuralFindings {
        has_document_open: head.starts_with("<!doctype html") || head.starts_with("<html"),
        has_document_close: lowered.trim_end().ends_with("</html>"),
        has_style_block: lowered.contains("<style"),
        has_content_container: count_matches(doc, CONTAINER_SELECTOR) > 0,
        length: html.len(),
    }
}

fn marker_counts(doc: &Html) -> MarkerCounts {
    MarkerCounts {
        cards: count_matches(doc, CARD_SELECTOR),
        titles: count_matches(doc, TITLE_SELECTOR),
        images: count_matches(doc, IMAGE_SELECTOR),
    }
}

fn count_matches(doc: &Html, selector: &str) -> u32 {
    Selector::parse(selector)
        .ok()
        .map(|sel| doc.select(&sel).count())
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
