//! The metadata store.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::{DisambiguationMode, StoreConfig};
use crate::disambiguation::{DisambiguationCache, Disambiguator};
use crate::error::Result;
use crate::owner::Owner;
use crate::provider::{MetadataProvider, ProviderRegistry};
use crate::value::MetadataValue;

/// Values stored under one disambiguated key, at most one per owner.
pub type MetadataList = Vec<Arc<MetadataValue>>;

/// Counts describing the store's current contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Distinct disambiguated keys holding at least one value.
    pub keys: usize,
    /// Stored values across all keys.
    pub entries: usize,
    /// Registered providers.
    pub providers: usize,
    /// Live subjects in the disambiguation cache (0 when uncached).
    pub cached_subjects: usize,
}

struct StoreState<S: ?Sized> {
    metadata: IndexMap<Arc<str>, MetadataList>,
    cache: Option<DisambiguationCache<S>>,
    providers: ProviderRegistry<S>,
}

impl<S: ?Sized + Hash + Eq> StoreState<S> {
    fn resolve<D>(&mut self, subject: &Arc<S>, key: &str, disambiguator: &D) -> Arc<str>
    where
        D: Disambiguator<S>,
    {
        match &mut self.cache {
            Some(cache) => cache.resolve(subject, key, disambiguator),
            None => disambiguator.disambiguate(&**subject, key).into(),
        }
    }

    /// Store `value` under `resolved`, replacing the entry of the same owner.
    fn insert(&mut self, resolved: Arc<str>, value: MetadataValue) {
        let value = Arc::new(value);
        let list = self.metadata.entry(resolved).or_default();
        match list.iter_mut().find(|existing| existing.owner() == value.owner()) {
            Some(existing) => *existing = value,
            None => list.push(value),
        }
    }

    /// Ask the provider registered for `key`, storing what it returns.
    fn materialize(&mut self, subject: &Arc<S>, key: &str, resolved: &Arc<str>) -> bool {
        let Some(provider) = self.providers.get(key) else {
            return false;
        };

        match provider.value(&**subject, key) {
            Some(value) => {
                trace!("Provider for '{}' materialized {}", key, resolved);
                self.insert(Arc::clone(resolved), value);
                true
            }
            None => {
                trace!("Provider for '{}' had no value for {}", key, resolved);
                false
            }
        }
    }
}

/// Owner-scoped metadata attached to externally owned subjects.
///
/// Values are filed under a disambiguated key built from the subject and the
/// metadata key by the store's [`Disambiguator`]. Each owner holds at most
/// one value per key; setting again replaces it.
///
/// Every operation holds a single store-wide lock. Provider callbacks run
/// under that lock and must not call back into the store.
pub struct MetadataStore<S: ?Sized, D> {
    disambiguator: D,
    config: StoreConfig,
    state: Mutex<StoreState<S>>,
}

impl<S, D> MetadataStore<S, D>
where
    S: ?Sized + Hash + Eq,
    D: Disambiguator<S>,
{
    /// Create a store with the default configuration.
    pub fn new(disambiguator: D) -> Self {
        Self::build(disambiguator, StoreConfig::default())
    }

    /// Create a store with a custom configuration.
    pub fn with_config(disambiguator: D, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(disambiguator, config))
    }

    fn build(disambiguator: D, config: StoreConfig) -> Self {
        let cache = match config.disambiguation {
            DisambiguationMode::Cached => Some(DisambiguationCache::new(config.sweep_threshold)),
            DisambiguationMode::Uncached => None,
        };

        Self {
            disambiguator,
            config,
            state: Mutex::new(StoreState {
                metadata: IndexMap::new(),
                cache,
                providers: ProviderRegistry::new(),
            }),
        }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Attach `value` to `subject` under `key`.
    ///
    /// If the value's owner already has a value there it is replaced in
    /// place; otherwise the value is appended after other owners' values.
    pub fn set_metadata(&self, subject: &Arc<S>, key: &str, value: MetadataValue) {
        let mut state = self.state.lock();
        let resolved = state.resolve(subject, key, &self.disambiguator);
        state.insert(resolved, value);
    }

    /// All values attached to `subject` under `key`, one per owner.
    ///
    /// When nothing is stored and a provider is registered for `key`, the
    /// provider is asked first. The returned list is a snapshot.
    pub fn get_metadata(&self, subject: &Arc<S>, key: &str) -> MetadataList {
        let mut state = self.state.lock();
        let resolved = state.resolve(subject, key, &self.disambiguator);

        if !state.metadata.contains_key(&*resolved) && !state.materialize(subject, key, &resolved) {
            return Vec::new();
        }
        state.metadata.get(&*resolved).cloned().unwrap_or_default()
    }

    /// Whether `subject` has any value under `key`, asking the provider for
    /// `key` when nothing is stored.
    pub fn has_metadata(&self, subject: &Arc<S>, key: &str) -> bool {
        let mut state = self.state.lock();
        let resolved = state.resolve(subject, key, &self.disambiguator);

        state.metadata.contains_key(&*resolved) || state.materialize(subject, key, &resolved)
    }

    /// Remove `owner`'s value for `subject` under `key`.
    ///
    /// The key is dropped once no owner has a value left. Does nothing if
    /// `owner` has no value there.
    pub fn remove_metadata(&self, subject: &Arc<S>, key: &str, owner: &Owner) {
        let mut state = self.state.lock();
        let resolved = state.resolve(subject, key, &self.disambiguator);

        let Some(list) = state.metadata.get_mut(&*resolved) else {
            return;
        };
        let before = list.len();
        list.retain(|value| value.owner() != owner);
        if list.len() == before {
            return;
        }

        if list.is_empty() {
            state.metadata.swap_remove(&*resolved);
        }
        debug!("Removed metadata {} owned by {}", resolved, owner);
    }

    /// Invalidate every stored value owned by `owner`, forcing lazy values
    /// to recompute on their next access.
    pub fn invalidate_all(&self, owner: &Owner) {
        let state = self.state.lock();
        let mut invalidated = 0;
        for value in state.metadata.values().flatten() {
            if value.owner() == owner {
                value.invalidate();
                invalidated += 1;
            }
        }
        debug!("Invalidated {} values owned by {}", invalidated, owner);
    }

    /// Register an on-demand provider for `key`.
    ///
    /// Returns `true` if the provider was added and `false` if `key` already
    /// had one, in which case nothing changes.
    pub fn register_provider(&self, key: &str, provider: Arc<dyn MetadataProvider<S>>) -> bool {
        self.state.lock().providers.register(key, provider)
    }

    /// Remove the provider for `key`. Returns whether one was registered.
    pub fn unregister_provider(&self, key: &str) -> bool {
        self.state.lock().providers.unregister(key)
    }

    /// Keys with a registered provider, in registration order.
    pub fn provider_keys(&self) -> Vec<String> {
        self.state.lock().providers.keys().map(str::to_owned).collect()
    }

    /// Remove every value and provider owned by `owner`.
    ///
    /// Returns the number of values removed. Used when the owner goes away,
    /// e.g. an extension being unloaded.
    pub fn prune_owner(&self, owner: &Owner) -> usize {
        let mut state = self.state.lock();

        let mut removed = 0;
        state.metadata.retain(|_, list| {
            let before = list.len();
            list.retain(|value| value.owner() != owner);
            removed += before - list.len();
            !list.is_empty()
        });
        let providers = state.providers.unregister_owner(owner);

        debug!(
            "Pruned {} values and {} providers owned by {}",
            removed, providers, owner
        );
        removed
    }

    /// Snapshot of the store's size.
    pub fn stats(&self) -> StoreStats {
        let state = self.state.lock();
        StoreStats {
            keys: state.metadata.len(),
            entries: state.metadata.values().map(Vec::len).sum(),
            providers: state.providers.len(),
            cached_subjects: state.cache.as_ref().map_or(0, DisambiguationCache::len),
        }
    }
}

impl<S, D> fmt::Debug for MetadataStore<S, D>
where
    S: ?Sized + Hash + Eq,
    D: Disambiguator<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("MetadataStore");
        s.field("config", &self.config);
        // Held by the caller when formatted from inside a callback
        match self.state.try_lock() {
            Some(state) => s.field("keys", &state.metadata.len()),
            None => s.field("keys", &"<locked>"),
        };
        s.finish_non_exhaustive()
    }
}
