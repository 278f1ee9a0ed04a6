use crate::{
    ProbeReport, ProbeStatus, ProgressEvent, WatchEffect, WatchMachine, WatchMsg, WatchOutcome,
    WatchState,
};

/// Pure update function: applies a message to the watcher and returns any effects.
///
/// Messages that arrive after the watcher left `Running` produce no effects and
/// leave the state untouched. This is what keeps a late round from overriding
/// a cancellation.
pub fn update(mut machine: WatchMachine, msg: WatchMsg) -> (WatchMachine, Vec<WatchEffect>) {
    let effects = match msg {
        WatchMsg::Start => {
            if machine.state() == WatchState::Idle {
                machine.transition(WatchState::Running);
                let attempt = machine.begin_round();
                vec![WatchEffect::RunRound { attempt }]
            } else {
                Vec::new()
            }
        }
        WatchMsg::RoundDue { elapsed } => {
            if !machine.is_running() {
                return (machine, Vec::new());
            }
            if elapsed >= machine.config().max_duration() {
                machine.transition(WatchState::TimedOut);
                vec![WatchEffect::Finish(WatchOutcome::TimedOut { elapsed })]
            } else {
                let attempt = machine.begin_round();
                vec![WatchEffect::RunRound { attempt }]
            }
        }
        WatchMsg::RoundFinished {
            attempt,
            elapsed,
            report,
        } => {
            if !machine.is_running() || attempt != machine.attempt() {
                return (machine, Vec::new());
            }
            let ProbeReport {
                status,
                phase,
                message,
            } = report;
            let progress = WatchEffect::EmitProgress(ProgressEvent {
                phase,
                message,
                elapsed,
                attempt,
            });
            match status {
                ProbeStatus::Ready { url } => {
                    machine.transition(WatchState::Succeeded);
                    vec![progress, WatchEffect::Finish(WatchOutcome::Succeeded { url })]
                }
                ProbeStatus::ServiceError { message } => {
                    machine.transition(WatchState::Failed);
                    vec![progress, WatchEffect::Finish(WatchOutcome::Failed { message })]
                }
                ProbeStatus::NotReady => {
                    let delay = machine.config().poll_interval();
                    vec![progress, WatchEffect::ScheduleRound { delay }]
                }
            }
        }
        WatchMsg::Stop => {
            if machine.is_running() {
                machine.transition(WatchState::Cancelled);
                vec![
                    WatchEffect::CancelScheduled,
                    WatchEffect::Finish(WatchOutcome::Cancelled),
                ]
            } else {
                Vec::new()
            }
        }
    };

    (machine, effects)
}
