use std::time::Duration;

use crate::ProbeReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMsg {
    /// Watcher was started; round 1 runs without delay.
    Start,
    /// The inter-round delay elapsed. `elapsed` is measured from start.
    RoundDue { elapsed: Duration },
    /// A round of probes completed.
    RoundFinished {
        attempt: u32,
        elapsed: Duration,
        report: ProbeReport,
    },
    /// External stop request (superseded search or user abort).
    Stop,
}
