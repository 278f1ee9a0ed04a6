use crate::WatchOutcome;

/// A raw search hit, as returned alongside the search response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultItem {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub author: String,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// What the presentation layer should do with a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeView {
    Navigate { url: String },
    /// Generated page unavailable; show the items we already have.
    LocalResults {
        notice: String,
        items: Vec<ResultItem>,
    },
    NotFound { notice: String },
    /// Superseded watcher; nothing to show.
    Discarded,
}

pub fn outcome_view(outcome: &WatchOutcome, items: &[ResultItem]) -> OutcomeView {
    let notice = match outcome {
        WatchOutcome::Succeeded { url } => return OutcomeView::Navigate { url: url.clone() },
        WatchOutcome::Cancelled => return OutcomeView::Discarded,
        WatchOutcome::Failed { message } => format!("Result page generation failed: {message}"),
        WatchOutcome::TimedOut { elapsed } => format!(
            "Result page was not ready after {}s",
            elapsed.as_secs()
        ),
    };

    if items.is_empty() {
        OutcomeView::NotFound { notice }
    } else {
        OutcomeView::LocalResults {
            notice,
            items: items.to_vec(),
        }
    }
}

/// Compact count display: `999`, `1.2k`, `3.4m`.
pub fn format_count(value: Option<u64>) -> String {
    match value {
        None => "0".to_string(),
        Some(n) if n >= 1_000_000 => format!("{:.1}m", n as f64 / 1_000_000.0),
        Some(n) if n >= 1_000 => format!("{:.1}k", n as f64 / 1_000.0),
        Some(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::format_count;

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(None), "0");
        assert_eq!(format_count(Some(999)), "999");
        assert_eq!(format_count(Some(1_234)), "1.2k");
        assert_eq!(format_count(Some(3_400_000)), "3.4m");
    }
}
