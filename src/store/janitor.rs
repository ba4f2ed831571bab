use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::Store;
use crate::db::KeyValueStore;
use crate::error::Result;

pub const DEFAULT_CLEANUP_INTERVAL_HOURS: i64 = 24;

/// Repeating insight cleanup. The caller drives time; the schedule only
/// decides whether a run is due.
#[derive(Debug, Clone)]
pub struct CleanupSchedule {
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl Default for CleanupSchedule {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_CLEANUP_INTERVAL_HOURS))
    }
}

impl CleanupSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// Due if it never ran or a full interval has passed
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.last_run.map_or(true, |last| now - last >= self.interval)
    }

    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.last_run.map(|last| last + self.interval)
    }

    /// Count `now` as a run without cleaning, pushing the next run out by
    /// one interval.
    pub fn mark_ran(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
    }

    /// Run cleanup if due. Returns the number of insights removed, or `None`
    /// when it was not yet time.
    pub fn run_if_due<K: KeyValueStore>(
        &mut self,
        store: &mut Store<K>,
        now: DateTime<Utc>,
    ) -> Result<Option<usize>> {
        if !self.is_due(now) {
            return Ok(None);
        }
        let removed = store.cleanup_old_insights_at(now)?;
        self.last_run = Some(now);
        debug!(removed, next = ?self.next_run(), "insight cleanup ran");
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_first_run_is_due() {
        let schedule = CleanupSchedule::default();
        assert!(schedule.is_due(Utc::now()));
        assert_eq!(schedule.interval(), Duration::hours(24));
    }

    #[test]
    fn test_runs_once_per_interval() {
        let mut store = Store::open(Database::open_memory().unwrap()).unwrap();
        let mut schedule = CleanupSchedule::default();
        let start = Utc::now();

        assert_eq!(schedule.run_if_due(&mut store, start).unwrap(), Some(0));
        assert_eq!(schedule.last_run(), Some(start));
        assert_eq!(
            schedule.run_if_due(&mut store, start + Duration::hours(23)).unwrap(),
            None
        );
        assert_eq!(
            schedule.run_if_due(&mut store, start + Duration::hours(24)).unwrap(),
            Some(0)
        );
        assert_eq!(schedule.next_run(), Some(start + Duration::hours(48)));
    }
}
