//! Pagewatch core: pure watcher state machine, scoring rules and view-model helpers.
mod effect;
mod keyword;
mod markers;
mod msg;
mod progress;
mod state;
mod update;
mod validation;
mod view_model;

pub use effect::{WatchEffect, WatchOutcome};
pub use keyword::{derived_locations, keyword_hash};
pub use markers::{is_completion_message, COMPLETION_MARKERS};
pub use msg::WatchMsg;
pub use progress::{combine_round, Phase, ProbeReport, ProbeStatus, ProgressEvent};
pub use state::{
    ArtifactCandidate, ConfigError, SearchRequest, WatchConfig, WatchMachine, WatchState,
};
pub use update::update;
pub use validation::{
    evaluate, MarkerCounts, StructuralFindings, ValidationResult, ValidationThresholds,
};
pub use view_model::{format_count, outcome_view, OutcomeView, ResultItem};
