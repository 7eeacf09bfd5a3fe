//! Per-subject cache of disambiguated keys.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, RandomState};
use std::sync::{Arc, Weak};

use log::{debug, trace};

use super::Disambiguator;

/// Cached keys for one subject.
struct CacheSlot<S: ?Sized> {
    subject: Weak<S>,
    keys: HashMap<String, Arc<str>>,
}

impl<S: ?Sized + Eq> CacheSlot<S> {
    fn new(subject: &Arc<S>) -> Self {
        Self {
            subject: Arc::downgrade(subject),
            keys: HashMap::new(),
        }
    }

    fn is_alive(&self) -> bool {
        self.subject.strong_count() > 0
    }

    fn matches(&self, subject: &Arc<S>) -> bool {
        self.subject
            .upgrade()
            .is_some_and(|live| Arc::ptr_eq(&live, subject) || *live == **subject)
    }
}

/// Maps (subject, key) to the disambiguated key, computing each pair once.
///
/// Subjects are held through [`Weak`] only, so the cache never keeps one
/// alive. Slots are grouped by the subject's hash; equal subjects land in the
/// same slot even when they are different allocations.
///
/// Dead slots are dropped whenever their hash bucket is visited. A full pass
/// runs once the slot count reaches a threshold that doubles with the live
/// population, so memory stays proportional to the subjects still alive.
pub struct DisambiguationCache<S: ?Sized> {
    hasher: RandomState,
    buckets: HashMap<u64, Vec<CacheSlot<S>>>,
    slots: usize,
    min_sweep: usize,
    next_sweep: usize,
}

impl<S: ?Sized + Hash + Eq> DisambiguationCache<S> {
    /// Create an empty cache. `sweep_threshold` is the smallest slot count
    /// that triggers a full pass.
    pub fn new(sweep_threshold: usize) -> Self {
        let min_sweep = sweep_threshold.max(1);
        Self {
            hasher: RandomState::new(),
            buckets: HashMap::new(),
            slots: 0,
            min_sweep,
            next_sweep: min_sweep,
        }
    }

    /// Return the disambiguated key for `subject` and `key`, asking
    /// `disambiguator` only on the first lookup of the pair.
    pub fn resolve<D>(&mut self, subject: &Arc<S>, key: &str, disambiguator: &D) -> Arc<str>
    where
        D: Disambiguator<S> + ?Sized,
    {
        let hash = self.hasher.hash_one(&**subject);
        let bucket = self.buckets.entry(hash).or_default();

        let before = bucket.len();
        bucket.retain(CacheSlot::is_alive);
        let reclaimed = before - bucket.len();

        let index = match bucket.iter().position(|slot| slot.matches(subject)) {
            Some(index) => index,
            None => {
                bucket.push(CacheSlot::new(subject));
                bucket.len() - 1
            }
        };
        let added = bucket.len() + reclaimed - before;

        let slot = &mut bucket[index];
        let resolved = match slot.keys.get(key) {
            Some(resolved) => Arc::clone(resolved),
            None => {
                trace!("Disambiguation cache miss for key '{}'", key);
                let resolved: Arc<str> = disambiguator.disambiguate(&**subject, key).into();
                slot.keys.insert(key.to_owned(), Arc::clone(&resolved));
                resolved
            }
        };

        self.slots = self.slots + added - reclaimed;
        if self.slots >= self.next_sweep {
            self.sweep();
        }

        resolved
    }

    /// Number of cached subjects that are still alive.
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|slot| slot.is_alive())
            .count()
    }

    /// Whether no live subject is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&mut self) {
        let before = self.slots;
        self.buckets.retain(|_, bucket| {
            bucket.retain(CacheSlot::is_alive);
            !bucket.is_empty()
        });
        self.slots = self.buckets.values().map(Vec::len).sum();
        self.next_sweep = (self.slots * 2).max(self.min_sweep);

        debug!(
            "Disambiguation cache sweep reclaimed {} of {} subjects",
            before - self.slots,
            before
        );
    }
}
