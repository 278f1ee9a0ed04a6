use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_warn};
use pagewatch_core::{combine_round, derived_locations, is_completion_message, Phase, ProbeReport};

use crate::service::{SearchService, ServiceError, StatusTag};
use crate::{ContentValidator, HttpClient, ServiceEndpoints, WatchTarget};

/// Per-watcher memory of the session log. Never shared between watchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeContext {
    /// Only log entries newer than this are requested.
    pub log_since: f64,
    /// Latched once a completion marker has been seen.
    pub server_finished: bool,
}

/// Runs the three readiness strategies against one search.
pub struct Prober {
    client: Arc<dyn HttpClient>,
    service: SearchService,
    validator: ContentValidator,
}

impl Prober {
    pub fn new(
        client: Arc<dyn HttpClient>,
        endpoints: ServiceEndpoints,
        validator: ContentValidator,
    ) -> Self {
        let service = SearchService::new(client.clone(), endpoints);
        Self {
            client,
            service,
            validator,
        }
    }

    /// One round: direct location, then status/log, then keyword guesses.
    ///
    /// Stops at the first decisive report. A failing strategy only adds its
    /// message to the combined report.
    pub async fn run_round(&self, target: &WatchTarget, ctx: &mut ProbeContext) -> ProbeReport {
        let mut reports = Vec::with_capacity(3);

        let direct = self.probe_direct(target).await;
        if direct.is_decisive() {
            return direct;
        }
        reports.push(direct);

        let status = self.probe_status(target, ctx).await;
        if status.is_decisive() {
            return status;
        }
        reports.push(status);

        if !target.candidate.has_hints() {
            let derived = self.probe_derived(target).await;
            if derived.is_decisive() {
                return derived;
            }
            reports.push(derived);
        }

        combine_round(reports)
    }

    /// Strategy 1: the location handed out by the search response.
    pub async fn probe_direct(&self, target: &WatchTarget) -> ProbeReport {
        match target.candidate.primary_url.as_deref() {
            Some(url) => {
                self.check_location(url, target.request.expected_count)
                    .await
            }
            None => ProbeReport::skipped("no result page location yet"),
        }
    }

    /// Strategy 2: explicit status endpoint, or the session log when the
    /// backend exposes no status tag.
    pub async fn probe_status(&self, target: &WatchTarget, ctx: &mut ProbeContext) -> ProbeReport {
        let Some(endpoint) = target.candidate.status_endpoint.as_deref() else {
            return self.scan_session_log(target, ctx).await;
        };

        let reply = match self.service.status(endpoint).await {
            Ok(reply) => reply,
            Err(ServiceError::Fetch(err)) => {
                engine_warn!("Status endpoint {} unreachable: {}", endpoint, err);
                return ProbeReport::not_ready(
                    Phase::NetworkError,
                    format!("status endpoint unreachable: {err}"),
                );
            }
            Err(err) => {
                engine_debug!("Status endpoint {} unusable ({}), scanning log", endpoint, err);
                return self.scan_session_log(target, ctx).await;
            }
        };

        match reply.tag() {
            StatusTag::Ready { url: Some(location) } => {
                match self.service.endpoints().resolve(&location) {
                    Some(url) => ProbeReport::ready(url, "status endpoint reports ready"),
                    None => ProbeReport::not_ready(
                        Phase::Pending,
                        format!("status endpoint returned unusable location {location}"),
                    ),
                }
            }
            StatusTag::Ready { url: None } => {
                self.recheck_primary(target, "status ready without location")
                    .await
            }
            StatusTag::Error { message } => {
                engine_info!("Status endpoint reports failure: {}", message);
                ProbeReport::service_error(message)
            }
            StatusTag::Pending { message } => ProbeReport::not_ready(
                Phase::Pending,
                message.unwrap_or_else(|| "generation pending".to_string()),
            ),
            StatusTag::Untagged => self.scan_session_log(target, ctx).await,
        }
    }

    /// Strategy 3: locations derived from the keyword hash.
    pub async fn probe_derived(&self, target: &WatchTarget) -> ProbeReport {
        let locations = derived_locations(self.service.endpoints().base(), &target.request.keyword);
        if locations.is_empty() {
            return ProbeReport::skipped("no keyword to derive locations from");
        }

        let tried = locations.len();
        for url in &locations {
            let report = self
                .check_location(url, target.request.expected_count)
                .await;
            if report.is_decisive() {
                return report;
            }
            engine_debug!("Derived location {} not ready: {}", url, report.message);
        }
        ProbeReport::not_ready(
            Phase::Guessing,
            format!("none of {tried} derived locations ready"),
        )
    }

    async fn scan_session_log(&self, target: &WatchTarget, ctx: &mut ProbeContext) -> ProbeReport {
        let session_id = target.request.session_id.as_str();
        if session_id.is_empty() {
            return ProbeReport::skipped("no session to follow");
        }

        match self.service.session_log(session_id, ctx.log_since).await {
            Ok(log) => {
                ctx.log_since = ctx.log_since.max(log.last_timestamp);
                if log
                    .entries
                    .iter()
                    .any(|entry| is_completion_message(&entry.message))
                {
                    engine_info!("Session {} log reports page generated", session_id);
                    ctx.server_finished = true;
                }
            }
            Err(err) => {
                engine_warn!("Session log for {} unavailable: {}", session_id, err);
                if !ctx.server_finished {
                    return ProbeReport::not_ready(
                        Phase::NetworkError,
                        format!("session log unavailable: {err}"),
                    );
                }
            }
        }

        if ctx.server_finished {
            self.recheck_primary(target, "server reports page generated")
                .await
        } else {
            ProbeReport::not_ready(Phase::Pending, "no completion marker in session log")
        }
    }

    /// The server claims to be done; confirm the location is actually fetchable.
    async fn recheck_primary(&self, target: &WatchTarget, reason: &str) -> ProbeReport {
        match target.candidate.primary_url.as_deref() {
            Some(url) => {
                let report = self
                    .check_location(url, target.request.expected_count)
                    .await;
                if report.is_decisive() {
                    report
                } else {
                    ProbeReport::not_ready(report.phase, format!("{reason}; {}", report.message))
                }
            }
            None => ProbeReport::not_ready(
                Phase::ServerFinished,
                format!("{reason}; location unknown"),
            ),
        }
    }

    /// Existence check, then a full fetch scored by the content validator.
    async fn check_location(&self, url: &str, expected_count: u32) -> ProbeReport {
        match self.client.head(url).await {
            Ok(status) if (200..300).contains(&status) => {}
            Ok(status) => {
                return ProbeReport::not_ready(
                    Phase::Creating,
                    format!("{url} returned {status}"),
                );
            }
            Err(err) => {
                engine_warn!("Existence check for {} failed: {}", url, err);
                return ProbeReport::not_ready(Phase::NetworkError, format!("{url}: {err}"));
            }
        }

        let response = match self.client.get(url).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                return ProbeReport::not_ready(
                    Phase::Creating,
                    format!("{url} returned {}", response.status),
                );
            }
            Err(err) => {
                engine_warn!("Fetching {} failed: {}", url, err);
                return ProbeReport::not_ready(Phase::NetworkError, format!("{url}: {err}"));
            }
        };

        let result = self.validator.validate(&response.text(), expected_count);
        if result.complete {
            ProbeReport::ready(url, format!("page complete, {}", result.summary()))
        } else {
            ProbeReport::not_ready(
                Phase::Validating,
                format!("{url} incomplete, {}", result.summary()),
            )
        }
    }
}
