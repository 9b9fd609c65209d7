//! Keyed read cache with in-flight deduplication and invalidate-after-write.
//!
//! Every entry carries a generation drawn from a cache-wide counter. [`QueryCache::invalidate`]
//! removes the entry and [`QueryCache::set`] replaces its generation, so any in-flight fetch is
//! detached. A fetch only writes its result back when the generation it started under is still
//! current, so a read that began before an invalidation can never repopulate the cache with
//! pre-write data, and a read that begins after the invalidation never joins the older fetch.
//! An entry holding neither data nor a fetch is removed, so failed lookups leave nothing behind.
//!
//! Map locks are never held across an await. In-flight fetches are [`Shared`] futures, so
//! every joiner receives the same result, errors included. Errors are never cached.

use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::IdeaResult;

type SharedFetch<V> = Shared<BoxFuture<'static, IdeaResult<V>>>;

struct Cached<V> {
    value: V,
    fetched_at: Instant,
}

struct Entry<V> {
    generation: u64,
    data: Option<Cached<V>>,
    in_flight: Option<SharedFetch<V>>,
}

impl<V> Entry<V> {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            data: None,
            in_flight: None,
        }
    }

    fn is_vacant(&self) -> bool {
        self.data.is_none() && self.in_flight.is_none()
    }
}

impl<V: Clone> Entry<V> {
    fn fresh_value(&self, stale_time: Option<Duration>) -> Option<V> {
        let cached = self.data.as_ref()?;
        match stale_time {
            Some(stale_time) if cached.fetched_at.elapsed() >= stale_time => None,
            _ => Some(cached.value.clone()),
        }
    }

    fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.data = None;
        self.in_flight = None;
    }
}

enum Lookup<V> {
    Hit(V),
    Wait(SharedFetch<V>),
}

pub struct QueryCache<K, V> {
    entries: Arc<DashMap<K, Entry<V>>>,
    /// Source of generations for the whole cache. Never reused, so an entry removed and
    /// recreated for the same key cannot be mistaken for the one an old fetch started under.
    generations: Arc<AtomicU64>,
    stale_time: Option<Duration>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            generations: Arc::clone(&self.generations),
            stale_time: self.stale_time,
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// `stale_time` of `None` keeps data until it is invalidated.
    pub fn new(stale_time: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            generations: Arc::new(AtomicU64::new(0)),
            stale_time,
        }
    }

    /// Returns fresh cached data, or joins/starts a fetch for `key`.
    pub async fn ensure<F, Fut>(&self, key: K, fetcher: F) -> IdeaResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = IdeaResult<V>> + Send + 'static,
    {
        match self.lookup(key, fetcher, true) {
            Lookup::Hit(value) => Ok(value),
            Lookup::Wait(fetch) => fetch.await,
        }
    }

    /// Fetches `key` regardless of cached data, joining a fetch already in flight.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> IdeaResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = IdeaResult<V>> + Send + 'static,
    {
        match self.lookup(key, fetcher, false) {
            Lookup::Hit(value) => Ok(value),
            Lookup::Wait(fetch) => fetch.await,
        }
    }

    /// Cached data for `key`, if present and fresh. Never fetches.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .and_then(|entry| entry.fresh_value(self.stale_time))
    }

    /// Replaces the cached data for `key`, detaching any in-flight fetch.
    pub fn set(&self, key: K, value: V) {
        let generation = self.next_generation();
        let mut entry = self
            .entries
            .entry(key)
            .or_insert_with(|| Entry::new(generation));
        entry.reset(generation);
        entry.data = Some(Cached {
            value,
            fetched_at: Instant::now(),
        });
    }

    /// Drops cached data and detaches any in-flight fetch for `key`.
    pub fn invalidate(&self, key: &K) {
        if self.entries.remove(key).is_some() {
            debug!(?key, "invalidating query");
        }
    }

    pub fn invalidate_all(&self) {
        debug!("invalidating all queries");
        self.entries.clear();
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Number of keys currently holding data.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.data.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn lookup<F, Fut>(&self, key: K, fetcher: F, use_cached: bool) -> Lookup<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = IdeaResult<V>> + Send + 'static,
    {
        let mut entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(self.next_generation()));

        if use_cached {
            if let Some(value) = entry.fresh_value(self.stale_time) {
                debug!(?key, "query cache hit");
                return Lookup::Hit(value);
            }
        }

        if let Some(fetch) = &entry.in_flight {
            debug!(?key, "joining in-flight query");
            return Lookup::Wait(fetch.clone());
        }

        debug!(?key, generation = entry.generation, "starting query");
        let generation = entry.generation;
        let entries = Arc::clone(&self.entries);
        let request = fetcher();
        let fetch = async move {
            let result = request.await;
            let mut vacated = false;
            if let Some(mut entry) = entries.get_mut(&key) {
                if entry.generation == generation {
                    entry.in_flight = None;
                    if let Ok(value) = &result {
                        entry.data = Some(Cached {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                        });
                    }
                    vacated = entry.is_vacant();
                } else {
                    debug!(?key, generation, "discarding result of invalidated query");
                }
            }
            // A failed fetch with nothing cached leaves no entry behind.
            if vacated {
                entries.remove_if(&key, |_, entry| {
                    entry.generation == generation && entry.is_vacant()
                });
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(fetch.clone());
        Lookup::Wait(fetch)
    }
}
