use std::sync::Arc;

use engine_logging::engine_info;
use pagewatch_core::{WatchConfig, WatchState};
use thiserror::Error;

use crate::{
    OutcomeSink, Prober, SearchOptions, SearchService, SearchSubmission, ServiceError, WatchError,
    WatchSubscription, WatchTarget, Watcher,
};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// A submitted search together with the watch following it.
pub struct ActiveSearch {
    pub submission: SearchSubmission,
    pub events: WatchSubscription,
}

/// Owns the single live watcher of a client session.
pub struct SessionCoordinator {
    prober: Arc<Prober>,
    sink: Arc<dyn OutcomeSink>,
    current: Option<Watcher>,
}

impl SessionCoordinator {
    pub fn new(prober: Arc<Prober>, sink: Arc<dyn OutcomeSink>) -> Self {
        Self {
            prober,
            sink,
            current: None,
        }
    }

    /// Retires any running watcher, then starts a fresh one for `target`.
    pub fn start_watch(
        &mut self,
        target: WatchTarget,
        config: WatchConfig,
    ) -> Result<WatchSubscription, WatchError> {
        self.stop_watch();
        let watcher = Watcher::with_sink(target, config, self.prober.clone(), self.sink.clone());
        let events = watcher.start()?;
        self.current = Some(watcher);
        Ok(events)
    }

    /// Stops and forgets the current watcher. No-op when there is none.
    pub fn stop_watch(&mut self) {
        if let Some(previous) = self.current.take() {
            if previous.is_running() {
                engine_info!(
                    "Superseding watcher for session {}",
                    previous.target().request.session_id
                );
            }
            previous.stop();
        }
    }

    /// Submits a search and follows it. The previous watcher is retired
    /// before the request goes out.
    pub async fn search(
        &mut self,
        service: &SearchService,
        keyword: &str,
        options: &SearchOptions,
        config: WatchConfig,
    ) -> Result<ActiveSearch, CoordinatorError> {
        self.stop_watch();
        let submission = service.submit(keyword, options).await?;
        let events = self.start_watch(submission.watch_target(), config)?;
        Ok(ActiveSearch { submission, events })
    }

    pub fn current(&self) -> Option<&Watcher> {
        self.current.as_ref()
    }

    pub fn current_state(&self) -> Option<WatchState> {
        self.current.as_ref().map(Watcher::state)
    }
}
