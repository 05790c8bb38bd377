//! Collection scheduler
//!
//! Runs one collection cycle immediately on start, then repeats collection and
//! status reporting on their own fixed intervals. Each loop awaits its job
//! before waiting for the next tick, so runs of the same job never overlap and
//! a slow cycle simply delays the next one.

use crate::services::{CollectorService, StatusService};
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Background scheduler for collection and status jobs
pub struct CollectionScheduler {
    state: Arc<AppState>,
    collect_interval: Duration,
    status_interval: Duration,
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop both loops once their current run (if any) completes
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("Scheduler task ended abnormally: {}", e);
        }
        info!("Collection scheduler stopped");
    }
}

impl CollectionScheduler {
    /// Create a scheduler using the configured intervals
    pub fn new(state: Arc<AppState>) -> Self {
        let collect_interval = state.config.scheduler.collect_interval();
        let status_interval = state.config.scheduler.status_interval();
        Self::with_intervals(state, collect_interval, status_interval)
    }

    pub fn with_intervals(
        state: Arc<AppState>,
        collect_interval: Duration,
        status_interval: Duration,
    ) -> Self {
        Self {
            state,
            collect_interval,
            status_interval,
        }
    }

    /// Start the scheduler on the current tokio runtime
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!(
                "Collection scheduler started: collect every {}s, status every {}s",
                self.collect_interval.as_secs_f64(),
                self.status_interval.as_secs_f64()
            );

            // Eager first run so the store has data as soon as possible
            run_collection(&self.state).await;
            run_status(&self.state);

            let collector = tokio::spawn(repeat(
                "collection",
                self.collect_interval,
                shutdown_rx.clone(),
                {
                    let state = Arc::clone(&self.state);
                    move || {
                        let state = Arc::clone(&state);
                        async move { run_collection(&state).await }
                    }
                },
            ));

            let status = tokio::spawn(repeat(
                "status",
                self.status_interval,
                shutdown_rx,
                {
                    let state = Arc::clone(&self.state);
                    move || {
                        let state = Arc::clone(&state);
                        async move { run_status(&state) }
                    }
                },
            ));

            let (collector, status) = tokio::join!(collector, status);
            for result in [collector, status] {
                if let Err(e) = result {
                    error!("Scheduler loop panicked: {}", e);
                }
            }
        });

        SchedulerHandle { shutdown_tx, task }
    }
}

/// Fire `job` every `period` until shutdown is signalled
async fn repeat<F, Fut>(name: &'static str, period: Duration, mut shutdown: watch::Receiver<bool>, job: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => job().await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Scheduler loop '{}' stopped", name);
}

/// Run one collection cycle; errors end the cycle, never the loop
async fn run_collection(state: &AppState) {
    match CollectorService::run(state).await {
        Ok(report) if !report.is_complete_success() => {
            warn!(
                "Collection cycle completed with {} failure(s)",
                report.failed()
            );
        }
        Ok(_) => {}
        Err(e) => error!("Collection cycle aborted: {}", e),
    }
}

fn run_status(state: &AppState) {
    if let Err(e) = StatusService::report(state) {
        error!("Status report failed: {}", e);
    }
}
