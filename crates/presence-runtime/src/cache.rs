//! Time-expiring, single-slot memoization of a loader.
//!
//! A [`TimedCache`] holds at most one value. The first call after the value
//! expires runs the loader while holding the slot's mutex, so concurrent
//! callers racing past expiry wait for that one load instead of starting
//! their own. Failed loads are handed back to the caller and never stored.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::clock::Clock;

/// A stored value and its validity window.
struct CacheEntry<T> {
    stored_at: Instant,
    /// `None` when `stored_at + ttl` does not fit in an [`Instant`].
    expires_at: Option<Instant>,
    value: Arc<T>,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Memoized result of one loader, valid for `ttl` after each load.
pub struct TimedCache<T> {
    /// Loader identity, used in log lines.
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T> TimedCache<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value, or run `load` and cache its result.
    ///
    /// The stored value is returned while its expiry is strictly later than
    /// the current time. Otherwise `load` runs with the slot locked and, on
    /// success, its result is stored until `now + ttl`. On failure the error
    /// is returned and the slot is left untouched.
    pub fn get_or_try_load<E, F>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let now = self.clock.now();
        let mut slot = self.lock_slot();

        if let Some(entry) = slot.as_ref() {
            if entry.is_fresh(now) {
                debug!(cache = self.name, "returning cached value");
                return Ok(Arc::clone(&entry.value));
            }
        }

        debug!(cache = self.name, "cache miss; loading");
        let value = Arc::new(load()?);
        *slot = Some(CacheEntry {
            stored_at: now,
            expires_at: now.checked_add(self.ttl),
            value: Arc::clone(&value),
        });
        debug!(cache = self.name, ttl_secs = self.ttl.as_secs(), "cache updated");

        Ok(value)
    }

    /// Discard the stored value so the next call loads again.
    pub fn invalidate(&self) {
        *self.lock_slot() = None;
        debug!(cache = self.name, "cache invalidated");
    }

    /// Time since the stored value was loaded, or `None` if nothing is stored.
    pub fn age(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.lock_slot()
            .as_ref()
            .map(|entry| now.saturating_duration_since(entry.stored_at))
    }

    /// `true` when a stored value would be returned without loading.
    pub fn is_valid(&self) -> bool {
        let now = self.clock.now();
        self.lock_slot()
            .as_ref()
            .map_or(false, |entry| entry.is_fresh(now))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // The slot only ever holds a complete entry or nothing, so a panic in
    // another holder leaves it consistent.
    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<CacheEntry<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    const WINDOW: Duration = Duration::from_secs(600);

    fn make_cache(ttl: Duration) -> (TimedCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TimedCache::new("test", ttl, clock.clone());
        (cache, clock)
    }

    /// Loader that counts its invocations and returns `"value-N"`.
    fn counting_loader(counter: &AtomicUsize) -> impl FnOnce() -> Result<String, String> + '_ {
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("value-{n}"))
        }
    }

    // ── cache miss on first call ──────────────────────────────────────────

    #[test]
    fn test_cache_miss_on_first_call() {
        let (cache, _clock) = make_cache(WINDOW);
        assert!(!cache.is_valid());
        assert!(cache.age().is_none());

        let loads = AtomicUsize::new(0);
        let value = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        assert_eq!(*value, "value-1");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(cache.is_valid());
    }

    // ── cache valid within window ─────────────────────────────────────────

    #[test]
    fn test_cache_hit_returns_identical_value() {
        let (cache, clock) = make_cache(WINDOW);
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        clock.advance(Duration::from_secs(599));
        let second = cache.get_or_try_load(counting_loader(&loads)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.age(), Some(Duration::from_secs(599)));
    }

    // ── cache expired after window ────────────────────────────────────────

    #[test]
    fn test_cache_reloads_once_after_window() {
        let (cache, clock) = make_cache(WINDOW);
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        clock.advance(WINDOW);
        assert!(!cache.is_valid());

        let second = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        let third = cache.get_or_try_load(counting_loader(&loads)).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(*second, "value-2");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let (cache, _clock) = make_cache(Duration::ZERO);
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load(counting_loader(&loads)).unwrap();
        cache.get_or_try_load(counting_loader(&loads)).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    // ── failures are not cached ───────────────────────────────────────────

    #[test]
    fn test_failure_is_not_cached() {
        let (cache, _clock) = make_cache(WINDOW);
        let loads = AtomicUsize::new(0);

        let err = cache
            .get_or_try_load(|| Err::<String, _>("boom".to_string()))
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(cache.age().is_none());

        let value = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        assert_eq!(*value, "value-1");
    }

    #[test]
    fn test_failure_after_expiry_keeps_retrying() {
        let (cache, clock) = make_cache(WINDOW);
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load(counting_loader(&loads)).unwrap();
        clock.advance(WINDOW);

        assert!(cache
            .get_or_try_load(|| Err::<String, _>("gone".to_string()))
            .is_err());

        let value = cache.get_or_try_load(counting_loader(&loads)).unwrap();
        assert_eq!(*value, "value-2");
    }

    // ── invalidation ──────────────────────────────────────────────────────

    #[test]
    fn test_invalidate_forces_reload() {
        let (cache, _clock) = make_cache(WINDOW);
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load(counting_loader(&loads)).unwrap();
        cache.invalidate();
        assert!(cache.age().is_none());

        cache.get_or_try_load(counting_loader(&loads)).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let (cache, clock) = make_cache(Duration::MAX);
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load(counting_loader(&loads)).unwrap();
        clock.advance(Duration::from_secs(10 * 365 * 24 * 3600));
        cache.get_or_try_load(counting_loader(&loads)).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    // ── concurrency ───────────────────────────────────────────────────────

    #[test]
    fn test_concurrent_callers_share_one_load() {
        const THREADS: usize = 8;

        let cache = Arc::new(TimedCache::new("shared", WINDOW, Arc::new(SystemClock)));
        let loads = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_try_load(|| {
                            loads.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok::<_, String>(vec![1, 2, 3])
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<Vec<i32>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_separate_caches_do_not_share_values() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let a: TimedCache<u32> = TimedCache::new("a", WINDOW, Arc::clone(&clock));
        let b: TimedCache<u32> = TimedCache::new("b", WINDOW, clock);

        assert_eq!(*a.get_or_try_load(|| Ok::<_, ()>(1)).unwrap(), 1);
        assert_eq!(*b.get_or_try_load(|| Ok::<_, ()>(2)).unwrap(), 2);
        assert_eq!(a.name(), "a");
        assert_eq!(b.ttl(), WINDOW);
    }
}
