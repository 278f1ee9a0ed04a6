use std::fmt;
use std::time::Duration;

use crate::ProgressEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEffect {
    /// Execute the probe strategies once, in order.
    RunRound { attempt: u32 },
    /// Wait before the next round.
    ScheduleRound { delay: Duration },
    /// Drop any pending scheduled round.
    CancelScheduled,
    EmitProgress(ProgressEvent),
    /// Deliver the terminal outcome. Emitted exactly once per watcher.
    Finish(WatchOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    Succeeded { url: String },
    Failed { message: String },
    TimedOut { elapsed: Duration },
    Cancelled,
}

impl WatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WatchOutcome::Succeeded { .. })
    }
}

impl fmt::Display for WatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchOutcome::Succeeded { url } => write!(f, "ready at {url}"),
            WatchOutcome::Failed { message } => write!(f, "failed: {message}"),
            WatchOutcome::TimedOut { elapsed } => {
                write!(f, "timed out after {}ms", elapsed.as_millis())
            }
            WatchOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}
