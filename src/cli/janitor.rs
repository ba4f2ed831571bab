use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::display::format_datetime;
use super::AppStore;
use crate::store::CleanupSchedule;

const POLL_INTERVAL: StdDuration = StdDuration::from_secs(1);

/// Run insight cleanup every `interval_hours` until Ctrl+C
pub fn run_janitor(store: &mut AppStore, interval_hours: i64) -> Result<()> {
    if interval_hours < 1 {
        bail!("--interval-hours must be at least 1");
    }
    let mut schedule = CleanupSchedule::new(Duration::hours(interval_hours));

    let shutdown = Arc::new(AtomicBool::new(false));
    ctrlc_handler(shutdown.clone());

    println!("Insight cleanup every {} hour(s)", interval_hours);
    println!("Press Ctrl+C to stop");

    while !shutdown.load(Ordering::SeqCst) {
        if let Some(removed) = tick(store, &mut schedule, Utc::now()) {
            if let Some(next) = schedule.next_run() {
                println!(
                    "Removed {} expired insight(s); next run {}",
                    removed,
                    format_datetime(&next)
                );
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
    println!("Janitor stopped");
    Ok(())
}

/// One pass of the loop. Picks up writes made by other processes before
/// cleaning, so a stale copy never overwrites them. Storage errors are
/// logged and retried on the next interval.
fn tick(store: &mut AppStore, schedule: &mut CleanupSchedule, now: DateTime<Utc>) -> Option<usize> {
    if !schedule.is_due(now) {
        return None;
    }
    if let Err(e) = store.reload() {
        warn!(error = %e, "could not reload data, skipping cleanup");
        schedule.mark_ran(now);
        return None;
    }
    match schedule.run_if_due(store, now) {
        Ok(removed) => {
            if let Some(n) = removed {
                info!(removed = n, "janitor pass complete");
            }
            removed
        }
        Err(e) => {
            warn!(error = %e, "insight cleanup failed");
            // drop the unsaved cleanup so close() has nothing stale to flush
            if let Err(e) = store.reload() {
                warn!(error = %e, "could not reload data after failed cleanup");
            }
            schedule.mark_ran(now);
            None
        }
    }
}

fn ctrlc_handler(shutdown: Arc<AtomicBool>) {
    let installed = ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, shutting down...");
        shutdown.store(true, Ordering::SeqCst);
    });
    if let Err(e) = installed {
        warn!(error = %e, "could not install Ctrl+C handler; stop the janitor by killing the process");
    }
}
