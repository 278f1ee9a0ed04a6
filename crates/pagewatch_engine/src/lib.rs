//! Pagewatch engine: fetch primitive, readiness probes and the watcher runtime.
mod coordinator;
mod decode;
mod fetch;
mod probe;
mod service;
mod types;
mod validate;
mod watcher;

pub use coordinator::{ActiveSearch, CoordinatorError, SessionCoordinator};
pub use decode::{decode_body, DecodedBody};
pub use fetch::{FetchSettings, HttpClient, ReqwestClient};
pub use probe::{ProbeContext, Prober};
pub use service::{
    generate_session_id, LogEntry, SearchOptions, SearchService, SearchSubmission, ServiceEndpoints,
    ServiceError, SessionLog, StatusReply, StatusTag, DEFAULT_BASE_URL,
};
pub use types::{FailureKind, FetchError, HttpResponse, WatchTarget};
pub use validate::ContentValidator;
pub use watcher::{
    ChannelOutcomeSink, OutcomeSink, WatchError, WatchEvent, WatchSubscription, Watcher,
};
