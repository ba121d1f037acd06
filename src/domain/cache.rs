//! Time-boxed single-entry cache for the latest report.
//!
//! The population path runs under the entry lock, so concurrent callers that
//! miss at the same time queue behind the first one and then reuse its result:
//! at most one load per validity window. Failed loads are handed back to the
//! caller that ran them and leave the cache untouched.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::domain::config::CotConfig;
use crate::domain::error::CotError;
use crate::domain::loader::load_latest_report;
use crate::domain::report::ReportSnapshot;
use crate::ports::data_port::DatasetPort;

struct Entry<T> {
    fetched_at: Instant,
    value: Arc<T>,
}

pub struct TtlCache<T> {
    ttl: Duration,
    entry: Mutex<Option<Entry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn get_or_try_load<E, F>(&self, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.get_or_try_load_at(Instant::now(), loader)
    }

    /// Same as [`get_or_try_load`](Self::get_or_try_load) with an explicit clock.
    pub fn get_or_try_load_at<E, F>(&self, now: Instant, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut guard = self.lock();
        if let Some(entry) = guard.as_ref() {
            if self.is_fresh(entry, now) {
                return Ok(Arc::clone(&entry.value));
            }
        }
        let value = Arc::new(loader()?);
        *guard = Some(Entry {
            fetched_at: now,
            value: Arc::clone(&value),
        });
        Ok(value)
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.lock().as_ref().map(|e| e.fetched_at)
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn is_fresh(&self, entry: &Entry<T>, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) < self.ttl
    }

    // A loader panic poisons the lock; the entry is either the old value or
    // None, both valid, so keep going.
    fn lock(&self) -> MutexGuard<'_, Option<Entry<T>>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub type ReportCache = TtlCache<ReportSnapshot>;

/// Loader, its settings and the cache in front of it.
pub struct CachedLoader {
    port: Arc<dyn DatasetPort + Send + Sync>,
    config: Arc<CotConfig>,
    cache: ReportCache,
}

impl CachedLoader {
    pub fn new(port: Arc<dyn DatasetPort + Send + Sync>, config: Arc<CotConfig>) -> Self {
        let cache = ReportCache::new(config.cache_ttl);
        Self {
            port,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &CotConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub fn load(&self) -> Result<Arc<ReportSnapshot>, CotError> {
        self.load_at(Instant::now())
    }

    pub fn load_at(&self, now: Instant) -> Result<Arc<ReportSnapshot>, CotError> {
        let mut missed = false;
        let snapshot = self.cache.get_or_try_load_at(now, || {
            missed = true;
            info!(
                "fetching latest report from {} dataset {}",
                self.config.base_url(),
                self.config.dataset
            );
            load_latest_report(self.port.as_ref(), &self.config)
        })?;
        if missed {
            info!(
                "loaded {} rows for report date {}",
                snapshot.table.len(),
                snapshot.report_date
            );
        } else {
            let age = self
                .cache
                .fetched_at()
                .map(|t| now.saturating_duration_since(t).as_secs())
                .unwrap_or_default();
            debug!(
                "cache hit for report date {} ({age}s old)",
                snapshot.report_date
            );
        }
        Ok(snapshot)
    }
}
