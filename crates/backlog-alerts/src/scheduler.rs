use crate::{evaluate, AlertConfig, BacklogSource, Notifier, Window};
use chrono::Utc;
use review_status::QueryError;

/// Serves the recurring backlog check until `shutdown` resolves.
///
/// The scheduler alternates between waiting for the next tick and running
/// one evaluation cycle. Cycles never overlap: each is awaited to
/// completion, and ticks missed while a cycle overruns are skipped rather
/// than queued. A failed cycle is logged and the next tick proceeds
/// independently. Resolving `shutdown` stops ticking without waiting on
/// any in-flight delivery.
pub async fn serve(
    source: impl BacklogSource,
    notifier: impl Notifier,
    config: AlertConfig,
    shutdown: impl std::future::Future<Output = ()>,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let _instant = ticker.tick().await; // Discard immediate first tick.

    tokio::pin!(shutdown);
    tracing::info!(
        client_ref = %config.client_ref,
        threshold = config.threshold,
        interval = ?config.interval,
        "backlog alert scheduler started"
    );

    loop {
        tokio::select! {
            _instant = ticker.tick() => (),
            () = &mut shutdown => {
                tracing::info!("backlog alert scheduler signaled to stop");
                return;
            }
        }

        if let Err(err) = run_cycle(&source, &notifier, &config, Utc::now()).await {
            tracing::error!(?err, "backlog check cycle failed (will retry next tick)");
        }
    }
}

/// Runs one evaluation cycle at instant `now`: queries the first-stage
/// backlog of every project under the configured client over the rolling
/// window ending at `now`, and notifies for each project at or above the
/// threshold.
///
/// A store failure aborts the whole cycle before any alerting. A delivery
/// failure is logged and does not block alerting the remaining projects.
pub async fn run_cycle(
    source: &impl BacklogSource,
    notifier: &impl Notifier,
    config: &AlertConfig,
    now: chrono::DateTime<Utc>,
) -> Result<(), QueryError> {
    let window = Window::ending_at(now, config.window);
    let rows = source.first_stage_backlog(&config.client_ref, window).await?;
    let events = evaluate(rows, config.threshold, window);
    tracing::debug!(alerts = events.len(), ?window, "evaluated first-stage backlog");

    for event in events {
        let message = event.message(config.threshold);
        match notifier.send_alert(&message, &config.recipients).await {
            Ok(()) => {
                tracing::info!(
                    project = %event.project_name,
                    backlog = event.backlog,
                    "sent backlog alert"
                );
            }
            Err(err) => {
                tracing::error!(?err, project = %event.project_name, "alert delivery failed");
            }
        }
    }
    Ok(())
}
