use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_debug, engine_info};
use pagewatch_core::{
    update, ProgressEvent, SearchRequest, WatchConfig, WatchEffect, WatchMachine, WatchMsg,
    WatchOutcome, WatchState,
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{ProbeContext, Prober, WatchTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Progress(ProgressEvent),
    /// Always the last event of a subscription.
    Finished(WatchOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error("watcher was already started")]
    AlreadyRunning,
}

/// Receives the terminal outcome of each watcher, exactly once.
pub trait OutcomeSink: Send + Sync {
    fn deliver(&self, request: &SearchRequest, outcome: &WatchOutcome);
}

/// Forwards outcomes into a channel.
pub struct ChannelOutcomeSink {
    tx: mpsc::UnboundedSender<(SearchRequest, WatchOutcome)>,
}

impl ChannelOutcomeSink {
    pub fn new(tx: mpsc::UnboundedSender<(SearchRequest, WatchOutcome)>) -> Self {
        Self { tx }
    }
}

impl OutcomeSink for ChannelOutcomeSink {
    fn deliver(&self, request: &SearchRequest, outcome: &WatchOutcome) {
        let _ = self.tx.send((request.clone(), outcome.clone()));
    }
}

/// Progress events followed by exactly one terminal outcome.
pub struct WatchSubscription {
    rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl WatchSubscription {
    pub async fn next(&mut self) -> Option<WatchEvent> {
        self.rx.recv().await
    }

    /// Drains the subscription, handing each progress event to `on_progress`.
    pub async fn outcome(
        mut self,
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> Option<WatchOutcome> {
        while let Some(event) = self.rx.recv().await {
            match event {
                WatchEvent::Progress(progress) => on_progress(&progress),
                WatchEvent::Finished(outcome) => return Some(outcome),
            }
        }
        None
    }
}

/// Polling loop for one search. Cheap to clone; clones share the same watcher.
#[derive(Clone)]
pub struct Watcher {
    shared: Arc<Shared>,
}

struct Shared {
    target: WatchTarget,
    prober: Arc<Prober>,
    sink: Option<Arc<dyn OutcomeSink>>,
    machine: Mutex<WatchMachine>,
    events: Mutex<Option<mpsc::UnboundedSender<WatchEvent>>>,
    cancel: CancellationToken,
}

impl Watcher {
    pub fn new(target: WatchTarget, config: WatchConfig, prober: Arc<Prober>) -> Self {
        Self::build(target, config, prober, None)
    }

    pub fn with_sink(
        target: WatchTarget,
        config: WatchConfig,
        prober: Arc<Prober>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self::build(target, config, prober, Some(sink))
    }

    fn build(
        target: WatchTarget,
        config: WatchConfig,
        prober: Arc<Prober>,
        sink: Option<Arc<dyn OutcomeSink>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                target,
                prober,
                sink,
                machine: Mutex::new(WatchMachine::new(config)),
                events: Mutex::new(None),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Starts polling on the current tokio runtime. Round 1 runs immediately.
    pub fn start(&self) -> Result<WatchSubscription, WatchError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let effects = {
            let mut machine = lock(&self.shared.machine);
            if machine.state() != WatchState::Idle {
                return Err(WatchError::AlreadyRunning);
            }
            *lock(&self.shared.events) = Some(tx);
            let (next, effects) = update(std::mem::take(&mut *machine), WatchMsg::Start);
            *machine = next;
            effects
        };
        engine_info!(
            "Watcher started keyword={} session_id={} expected={}",
            self.shared.target.request.keyword,
            self.shared.target.request.session_id,
            self.shared.target.request.expected_count
        );

        let shared = self.shared.clone();
        let started_at = Instant::now();
        tokio::spawn(drive(shared, started_at, effects));
        Ok(WatchSubscription { rx })
    }

    /// Cancels a running watcher. A round already in flight finishes but is ignored.
    pub fn stop(&self) {
        let effects = self.shared.dispatch(WatchMsg::Stop);
        for effect in effects {
            self.shared.apply(effect);
        }
    }

    pub fn state(&self) -> WatchState {
        lock(&self.shared.machine).state()
    }

    pub fn attempt(&self) -> u32 {
        lock(&self.shared.machine).attempt()
    }

    pub fn is_running(&self) -> bool {
        self.state() == WatchState::Running
    }

    pub fn target(&self) -> &WatchTarget {
        &self.shared.target
    }
}

impl Shared {
    fn dispatch(&self, msg: WatchMsg) -> Vec<WatchEffect> {
        let mut machine = lock(&self.machine);
        let (next, effects) = update(std::mem::take(&mut *machine), msg);
        *machine = next;
        effects
    }

    /// Executes the effects that need no awaiting.
    fn apply(&self, effect: WatchEffect) {
        match effect {
            WatchEffect::EmitProgress(progress) => {
                engine_debug!(
                    "Round {} [{}] after {}ms: {}",
                    progress.attempt,
                    progress.phase,
                    progress.elapsed_ms(),
                    progress.message
                );
                if let Some(tx) = lock(&self.events).as_ref() {
                    let _ = tx.send(WatchEvent::Progress(progress));
                }
            }
            WatchEffect::CancelScheduled => self.cancel.cancel(),
            WatchEffect::Finish(outcome) => {
                engine_info!(
                    "Watcher for session {} finished: {}",
                    self.target.request.session_id,
                    outcome
                );
                if let Some(sink) = &self.sink {
                    sink.deliver(&self.target.request, &outcome);
                }
                if let Some(tx) = lock(&self.events).take() {
                    let _ = tx.send(WatchEvent::Finished(outcome));
                }
            }
            WatchEffect::RunRound { .. } | WatchEffect::ScheduleRound { .. } => {
                engine_debug!("Ignoring loop effect outside the driver: {:?}", effect);
            }
        }
    }
}

async fn drive(shared: Arc<Shared>, started_at: Instant, initial: Vec<WatchEffect>) {
    let mut ctx = ProbeContext::default();
    let mut queue: VecDeque<WatchEffect> = initial.into();

    while let Some(effect) = queue.pop_front() {
        match effect {
            WatchEffect::RunRound { attempt } => {
                let report = shared.prober.run_round(&shared.target, &mut ctx).await;
                queue.extend(shared.dispatch(WatchMsg::RoundFinished {
                    attempt,
                    elapsed: started_at.elapsed(),
                    report,
                }));
            }
            WatchEffect::ScheduleRound { delay } => {
                tokio::select! {
                    _ = shared.cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                queue.extend(shared.dispatch(WatchMsg::RoundDue {
                    elapsed: started_at.elapsed(),
                }));
            }
            other => shared.apply(other),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
