use pagewatch_core::{format_count, OutcomeView, ProgressEvent, ResultItem};

const DESCRIPTION_WIDTH: usize = 80;

pub fn progress_line(clock: &str, event: &ProgressEvent) -> String {
    format!(
        "[{clock}] round {} {:>6.1}s {:<14} {}",
        event.attempt,
        event.elapsed.as_secs_f64(),
        event.phase.as_str(),
        event.message
    )
}

/// Lines to print for the final outcome.
pub fn outcome_lines(view: &OutcomeView) -> Vec<String> {
    match view {
        OutcomeView::Navigate { url } => vec![format!("Result page ready: {url}")],
        OutcomeView::LocalResults { notice, items } => {
            let mut lines = vec![
                notice.clone(),
                format!("Showing {} results from the search response:", items.len()),
            ];
            for (index, item) in items.iter().enumerate() {
                lines.extend(item_lines(index + 1, item));
            }
            lines
        }
        OutcomeView::NotFound { notice } => {
            vec![notice.clone(), "No results found.".to_string()]
        }
        OutcomeView::Discarded => vec!["Search cancelled.".to_string()],
    }
}

fn item_lines(position: usize, item: &ResultItem) -> Vec<String> {
    let title = if item.title.is_empty() {
        "(untitled)"
    } else {
        item.title.as_str()
    };
    let mut lines = vec![format!(
        "{position:>3}. {title}  [{} likes, {} comments]",
        format_count(item.likes),
        format_count(item.comments)
    )];
    if !item.author.is_empty() {
        lines.push(format!("     by {}", item.author));
    }
    if !item.description.is_empty() {
        lines.push(format!("     {}", truncate(&item.description, DESCRIPTION_WIDTH)));
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pagewatch_core::Phase;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn progress_line_shows_round_phase_and_message() {
        let event = ProgressEvent {
            phase: Phase::Validating,
            message: "incomplete".to_string(),
            elapsed: Duration::from_millis(2_500),
            attempt: 2,
        };
        assert_eq!(
            progress_line("10:00:00", &event),
            "[10:00:00] round 2    2.5s validating     incomplete"
        );
    }

    #[test]
    fn local_results_list_items_with_counts() {
        let view = OutcomeView::LocalResults {
            notice: "Result page was not ready after 180s".to_string(),
            items: vec![ResultItem {
                title: "Lipstick review".to_string(),
                author: "amy".to_string(),
                likes: Some(1_234),
                ..ResultItem::default()
            }],
        };
        assert_eq!(
            outcome_lines(&view),
            vec![
                "Result page was not ready after 180s".to_string(),
                "Showing 1 results from the search response:".to_string(),
                "  1. Lipstick review  [1.2k likes, 0 comments]".to_string(),
                "     by amy".to_string(),
            ]
        );
    }

    #[test]
    fn long_descriptions_are_truncated_on_char_boundaries() {
        let text = "口".repeat(100);
        let cut = truncate(&text, 10);
        assert_eq!(cut.chars().count(), 11);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short", 10), "short");
    }
}
