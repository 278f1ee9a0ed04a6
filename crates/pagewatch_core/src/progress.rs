use std::fmt;
use std::time::Duration;

/// Short tag describing where a round ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Location known but not reachable yet.
    Creating,
    /// Location reachable but content not complete.
    Validating,
    /// Status endpoint reports work in progress.
    Pending,
    /// Session log says the page was generated; location not confirmed yet.
    ServerFinished,
    /// Keyword-derived guesses did not resolve.
    Guessing,
    /// Transport failure; retried next round.
    NetworkError,
    /// Strategy had nothing to work with.
    Skipped,
    Ready,
    Failed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Creating => "creating",
            Phase::Validating => "validating",
            Phase::Pending => "pending",
            Phase::ServerFinished => "server-finished",
            Phase::Guessing => "guessing",
            Phase::NetworkError => "network-error",
            Phase::Skipped => "skipped",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub message: String,
    pub elapsed: Duration,
    pub attempt: u32,
}

impl ProgressEvent {
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Ready { url: String },
    NotReady,
    /// The service explicitly reported that generation failed.
    ServiceError { message: String },
}

/// Result of one strategy, or of a whole round once combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub phase: Phase,
    pub message: String,
}

impl ProbeReport {
    pub fn ready(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Ready { url: url.into() },
            phase: Phase::Ready,
            message: message.into(),
        }
    }

    pub fn not_ready(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::NotReady,
            phase,
            message: message.into(),
        }
    }

    pub fn service_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: ProbeStatus::ServiceError {
                message: message.clone(),
            },
            phase: Phase::Failed,
            message,
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::not_ready(Phase::Skipped, message)
    }

    /// Ready or service error: the round stops here.
    pub fn is_decisive(&self) -> bool {
        !matches!(self.status, ProbeStatus::NotReady)
    }
}

/// Folds the reports of one round into a single report.
///
/// The first decisive report wins. Otherwise the phase of the last strategy
/// that actually ran is kept and all messages are joined.
pub fn combine_round(reports: Vec<ProbeReport>) -> ProbeReport {
    if let Some(decisive) = reports.iter().find(|report| report.is_decisive()) {
        return decisive.clone();
    }

    let phase = reports
        .iter()
        .rev()
        .map(|report| report.phase)
        .find(|phase| *phase != Phase::Skipped)
        .unwrap_or(Phase::Skipped);
    let message = reports
        .iter()
        .map(|report| report.message.as_str())
        .filter(|message| !message.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    ProbeReport::not_ready(phase, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_prefers_first_decisive_report() {
        let combined = combine_round(vec![
            ProbeReport::not_ready(Phase::Creating, "not there"),
            ProbeReport::service_error("scrape failed"),
            ProbeReport::ready("http://x/a.html", "ok"),
        ]);
        assert_eq!(
            combined.status,
            ProbeStatus::ServiceError {
                message: "scrape failed".into()
            }
        );
    }

    #[test]
    fn combine_keeps_last_non_skipped_phase() {
        let combined = combine_round(vec![
            ProbeReport::not_ready(Phase::Creating, "a"),
            ProbeReport::not_ready(Phase::Pending, "b"),
            ProbeReport::skipped("c"),
        ]);
        assert_eq!(combined.phase, Phase::Pending);
        assert_eq!(combined.message, "a; b; c");
    }

    #[test]
    fn combine_of_only_skipped_is_skipped() {
        let combined = combine_round(vec![ProbeReport::skipped("")]);
        assert_eq!(combined.phase, Phase::Skipped);
        assert!(combined.message.is_empty());
    }
}
