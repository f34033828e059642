//! Record cache shared by every channel of one source
//!
//! Live, recent and upcoming channels read the same record list. Sharing one
//! cache means one fetch per refresh and one throttled "no data" warning
//! across all of them.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::record::GameRecord;
use crate::source::DataSource;

#[derive(Debug, Default)]
struct CacheState {
    records: Arc<Vec<GameRecord>>,
    updated_at: Option<Instant>,
    last_warning: Option<Instant>,
}

#[derive(Debug)]
pub struct SharedRecordCache {
    state: Mutex<CacheState>,
    /// Serializes fetches so concurrent channels do not fetch twice
    fetch_lock: tokio::sync::Mutex<()>,
    warning_cooldown: Duration,
}

impl SharedRecordCache {
    pub fn new(warning_cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            fetch_lock: tokio::sync::Mutex::new(()),
            warning_cooldown,
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn store(&self, records: Vec<GameRecord>) {
        let mut state = self.state();
        state.records = Arc::new(records);
        state.updated_at = Some(Instant::now());
    }

    /// Current records; empty until the first successful store
    pub fn records(&self) -> Arc<Vec<GameRecord>> {
        self.state().records.clone()
    }

    pub fn age(&self) -> Option<Duration> {
        self.state().updated_at.map(|t| t.elapsed())
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age().map_or(true, |age| age >= max_age)
    }

    /// Fetch from `source` and store the result. On failure the previous
    /// records stay in place.
    pub async fn refresh(&self, source: &dyn DataSource) -> crate::Result<usize> {
        let _guard = self.fetch_lock.lock().await;
        let records = source.fetch().await?;
        let count = records.len();
        self.store(records);
        tracing::debug!("Cached {} records from {}", count, source.name());
        Ok(count)
    }

    /// Records no older than `max_age`, refreshing first when stale
    pub async fn records_or_refresh(
        &self,
        source: &dyn DataSource,
        max_age: Duration,
    ) -> Arc<Vec<GameRecord>> {
        if self.is_stale(max_age) {
            let _guard = self.fetch_lock.lock().await;
            // another channel may have refreshed while we waited
            if self.is_stale(max_age) {
                match source.fetch().await {
                    Ok(records) => self.store(records),
                    Err(e) => tracing::error!("Failed to fetch records from {}: {}", source.name(), e),
                }
            }
        }
        self.records()
    }

    /// Log a "no data" warning at most once per cooldown. Returns whether it
    /// was logged.
    pub fn warn_no_data(&self, context: &str) -> bool {
        let mut state = self.state();
        let now = Instant::now();
        let due = state
            .last_warning
            .map_or(true, |t| now.saturating_duration_since(t) >= self.warning_cooldown);
        if due {
            tracing::warn!("No {} games available", context);
            state.last_warning = Some(now);
        }
        due
    }
}
