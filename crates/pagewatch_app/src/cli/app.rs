use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use engine_logging::{engine_info, engine_warn};
use pagewatch_core::{outcome_view, SearchRequest, WatchOutcome};
use pagewatch_engine::{
    ContentValidator, FetchSettings, OutcomeSink, Prober, ReqwestClient, SearchService,
    ServiceEndpoints, SessionCoordinator, WatchEvent,
};

use super::config::{load_config, report_load};
use super::render::{outcome_lines, progress_line};
use super::Args;

/// Records terminal outcomes in the log.
struct LogOutcomeSink;

impl OutcomeSink for LogOutcomeSink {
    fn deliver(&self, request: &SearchRequest, outcome: &WatchOutcome) {
        engine_info!(
            "Search '{}' (session {}) ended: {}",
            request.keyword,
            request.session_id,
            outcome
        );
    }
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let (mut config, warning) = load_config(&args.config);
    config.apply_args(&args);
    engine_logging::initialize(&config.logging);
    report_load(&args.config, warning.as_deref());

    let watch_config = config.watch_config().context("invalid poll settings")?;
    let endpoints = ServiceEndpoints::new(&config.base_url)?;
    let search_client = Arc::new(ReqwestClient::new(FetchSettings::for_search())?);
    let probe_client = Arc::new(ReqwestClient::new(FetchSettings::default())?);
    let service = SearchService::new(search_client, endpoints.clone());
    let prober = Arc::new(Prober::new(
        probe_client,
        endpoints,
        ContentValidator::new(config.validation),
    ));
    let mut coordinator = SessionCoordinator::new(prober, Arc::new(LogOutcomeSink));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        if !service.is_healthy().await {
            engine_warn!(
                "Search service at {} is not reachable; trying anyway",
                service.endpoints().base()
            );
        }

        println!("Searching for '{}'...", args.keyword);
        let active = coordinator
            .search(
                &service,
                &args.keyword,
                &config.search_options(),
                watch_config,
            )
            .await?;
        println!(
            "Session {}: {} results, waiting for result page",
            active.submission.request.session_id,
            active.submission.items.len()
        );

        let mut events = active.events;
        let outcome = loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(WatchEvent::Progress(progress)) => {
                        let clock = Local::now().format("%H:%M:%S").to_string();
                        println!("{}", progress_line(&clock, &progress));
                    }
                    Some(WatchEvent::Finished(outcome)) => break outcome,
                    None => break WatchOutcome::Cancelled,
                },
                _ = tokio::signal::ctrl_c() => {
                    engine_info!("Interrupted, stopping watcher");
                    coordinator.stop_watch();
                }
            }
        };

        let view = outcome_view(&outcome, &active.submission.items);
        for line in outcome_lines(&view) {
            println!("{line}");
        }
        let code = if outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        };
        Ok::<_, anyhow::Error>(code)
    })
}
