pub mod summary;

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::config::probe_config::ProbeSettings;
use crate::http_probe::prelude::*;
use crate::http_probe::probe::Transport;
use crate::http_probe::worker::follow_redirects;
use crate::target::{Target, parse_url};
use summary::ProfileSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One probe, the terminal response is printed.
    Single,
    /// `n` probes, summarized afterwards.
    Profile(usize),
}

impl RunMode {
    pub fn count(&self) -> usize {
        match self {
            RunMode::Single => 1,
            RunMode::Profile(count) => *count,
        }
    }

    pub fn is_profiling(&self) -> bool {
        matches!(self, RunMode::Profile(_))
    }
}

/// Runs `count` probes against `target`, one at a time.
///
/// Every repetition gets its own task and the result is awaited before the next one is
/// dispatched, so the returned results are in repetition order. The first failure aborts
/// the run and the results gathered so far are dropped.
pub async fn collect_results<T>(
    transport: Arc<T>,
    target: &Target,
    count: usize,
    settings: &ProbeSettings,
    print_response: bool,
) -> Result<Vec<ProbeResult>, ProbeError>
where
    T: Transport + 'static,
{
    let mut results = Vec::with_capacity(count);

    for repetition in 1..=count {
        let (tx, rx) = oneshot::channel();
        let transport = Arc::clone(&transport);
        let target = target.clone();
        let settings = settings.clone();

        tokio::spawn(async move {
            let outcome =
                follow_redirects(transport.as_ref(), target, &settings, print_response).await;
            let _ = tx.send(outcome);
        });

        let result = rx.await.map_err(|_| ProbeError::WorkerLost)??;
        log::debug!(
            "Repetition {repetition}/{count}: status {}, {}ms, {} bytes",
            result.status_code,
            result.time_taken_ms,
            result.response_size
        );
        results.push(result);
    }

    Ok(results)
}

/// Probes `url` according to `mode`.
/// Profiling runs return their summary, single runs print the response and return `None`.
pub async fn run_tasks<T>(
    transport: Arc<T>,
    url: &str,
    mode: RunMode,
    settings: &ProbeSettings,
) -> Result<Option<ProfileSummary>, ProbeError>
where
    T: Transport + 'static,
{
    let target = parse_url(url);
    log::info!(
        "Probing {target} ({} repetition(s), profiling: {})",
        mode.count(),
        mode.is_profiling()
    );

    let results = collect_results(
        transport,
        &target,
        mode.count(),
        settings,
        !mode.is_profiling(),
    )
    .await?;

    match mode {
        RunMode::Single => Ok(None),
        RunMode::Profile(_) => Ok(ProfileSummary::from_results(&results)),
    }
}
