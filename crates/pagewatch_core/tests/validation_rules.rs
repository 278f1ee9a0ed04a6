use pagewatch_core::{
    evaluate, outcome_view, MarkerCounts, OutcomeView, ResultItem, StructuralFindings,
    ValidationThresholds, WatchOutcome,
};
use std::time::Duration;

fn complete_structure() -> StructuralFindings {
    StructuralFindings {
        has_document_open: true,
        has_document_close: true,
        has_style_block: true,
        has_content_container: true,
        length: 4_096,
    }
}

fn counts(cards: u32, titles: u32, images: u32) -> MarkerCounts {
    MarkerCounts {
        cards,
        titles,
        images,
    }
}

#[test]
fn matching_counts_with_full_structure_are_complete() {
    let thresholds = ValidationThresholds::default();
    for expected in [1, 2, 5, 10, 21, 50] {
        let result = evaluate(
            &complete_structure(),
            &counts(expected, expected, expected),
            expected,
            &thresholds,
        );
        assert!(result.complete, "expected {expected}: {result:?}");
        assert_eq!(result.pass_ratio, 1.0);
    }
}

#[test]
fn counts_below_minimum_are_incomplete() {
    let thresholds = ValidationThresholds::default();
    for expected in [2, 5, 10, 21, 50] {
        let below = thresholds.min_expected(expected) - 1;
        let result = evaluate(
            &complete_structure(),
            &counts(below, below, below),
            expected,
            &thresholds,
        );
        assert!(!result.complete, "expected {expected}: {result:?}");
    }
}

#[test]
fn two_missing_images_out_of_ten_keep_page_incomplete() {
    let result = evaluate(
        &complete_structure(),
        &counts(10, 10, 8),
        10,
        &ValidationThresholds::default(),
    );

    assert!(!result.complete);
    assert!(result.pass_ratio < 0.95);
    assert_eq!(result.failed_checks, vec!["marker-spread"]);
}

#[test]
fn structure_alone_decides_when_no_count_expected() {
    let thresholds = ValidationThresholds::default();
    let complete = evaluate(&complete_structure(), &counts(0, 0, 0), 0, &thresholds);
    assert!(complete.complete);

    let truncated = StructuralFindings {
        has_document_close: false,
        ..complete_structure()
    };
    let result = evaluate(&truncated, &counts(0, 0, 0), 0, &thresholds);
    assert!(!result.complete);
    assert_eq!(result.pass_ratio, 0.8);
    assert_eq!(result.failed_checks, vec!["document-close"]);
}

#[test]
fn short_document_fails_length_check() {
    let short = StructuralFindings {
        length: 120,
        ..complete_structure()
    };
    let result = evaluate(
        &short,
        &counts(3, 3, 3),
        3,
        &ValidationThresholds::default(),
    );
    assert!(!result.complete);
    assert!(result.failed_checks.contains(&"min-length"));
}

#[test]
fn relaxed_thresholds_are_honoured() {
    let relaxed = ValidationThresholds {
        pass_ratio: 0.85,
        ..ValidationThresholds::default()
    };
    let result = evaluate(&complete_structure(), &counts(10, 10, 8), 10, &relaxed);
    assert!(result.complete);
}

#[test]
fn failed_outcome_falls_back_to_local_items() {
    let items = vec![ResultItem {
        title: "Lip tint review".to_string(),
        ..ResultItem::default()
    }];
    let view = outcome_view(
        &WatchOutcome::Failed {
            message: "scrape failed".to_string(),
        },
        &items,
    );
    assert_eq!(
        view,
        OutcomeView::LocalResults {
            notice: "Result page generation failed: scrape failed".to_string(),
            items,
        }
    );
}

#[test]
fn timeout_without_items_is_not_found() {
    let view = outcome_view(
        &WatchOutcome::TimedOut {
            elapsed: Duration::from_secs(180),
        },
        &[],
    );
    assert_eq!(
        view,
        OutcomeView::NotFound {
            notice: "Result page was not ready after 180s".to_string()
        }
    );
}

#[test]
fn success_navigates_and_cancel_is_discarded() {
    let view = outcome_view(
        &WatchOutcome::Succeeded {
            url: "http://svc/a.html".to_string(),
        },
        &[],
    );
    assert_eq!(
        view,
        OutcomeView::Navigate {
            url: "http://svc/a.html".to_string()
        }
    );
    assert_eq!(
        outcome_view(&WatchOutcome::Cancelled, &[]),
        OutcomeView::Discarded
    );
}
