//! On-demand metadata providers.
//!
//! A provider answers for one metadata key when the store has nothing stored
//! for a subject. The value it returns is stored like any other entry, so a
//! provider is consulted once per subject unless it returns `None`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::owner::Owner;
use crate::value::MetadataValue;

/// Source of metadata computed on demand.
///
/// Implementations must be thread-safe (Send + Sync) since the store may be
/// shared across threads. [`MetadataProvider::value`] runs while the store is
/// locked and must not call back into the store.
pub trait MetadataProvider<S: ?Sized>: Send + Sync {
    /// The owner this provider answers on behalf of.
    fn owner(&self) -> &Owner;

    /// Produce the value of `key` for `subject`, or `None` if there is none.
    ///
    /// Runs under the store lock: calling any store method from here,
    /// including formatting the store with `{:?}`, deadlocks.
    ///
    /// `None` is not remembered; the provider is asked again on the next
    /// lookup.
    fn value(&self, subject: &S, key: &str) -> Option<MetadataValue>;
}

/// Adapts a closure into a [`MetadataProvider`].
pub struct FnProvider<F> {
    owner: Owner,
    provide: F,
}

impl<F> FnProvider<F> {
    /// Wrap `provide` as a provider answering for `owner`.
    pub fn new(owner: Owner, provide: F) -> Self {
        Self { owner, provide }
    }
}

impl<S, F> MetadataProvider<S> for FnProvider<F>
where
    S: ?Sized,
    F: Fn(&S, &str) -> Option<MetadataValue> + Send + Sync,
{
    fn owner(&self) -> &Owner {
        &self.owner
    }

    fn value(&self, subject: &S, key: &str) -> Option<MetadataValue> {
        (self.provide)(subject, key)
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Key to provider map, at most one provider per key.
pub struct ProviderRegistry<S: ?Sized> {
    providers: IndexMap<String, Arc<dyn MetadataProvider<S>>>,
}

impl<S: ?Sized> ProviderRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: IndexMap::new(),
        }
    }

    /// Register `provider` for `key`.
    ///
    /// Returns `false` and leaves the registry unchanged if `key` already has
    /// a provider.
    pub fn register(&mut self, key: &str, provider: Arc<dyn MetadataProvider<S>>) -> bool {
        if self.providers.contains_key(key) {
            debug!("Provider for '{}' already registered, keeping existing", key);
            return false;
        }

        debug!("Registered provider for '{}' owned by {}", key, provider.owner());
        self.providers.insert(key.to_owned(), provider);
        true
    }

    /// Remove the provider for `key`. Returns whether one was registered.
    pub fn unregister(&mut self, key: &str) -> bool {
        let removed = self.providers.shift_remove(key).is_some();
        if removed {
            debug!("Unregistered provider for '{}'", key);
        }
        removed
    }

    /// Remove every provider owned by `owner`, returning how many were removed.
    pub fn unregister_owner(&mut self, owner: &Owner) -> usize {
        let before = self.providers.len();
        self.providers.retain(|_, provider| provider.owner() != owner);
        before - self.providers.len()
    }

    /// The provider registered for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<dyn MetadataProvider<S>>> {
        self.providers.get(key).cloned()
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<S: ?Sized> Default for ProviderRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str) -> Owner {
        Owner::new(name).unwrap()
    }

    fn upper(owner: Owner) -> Arc<dyn MetadataProvider<str>> {
        Arc::new(FnProvider::new(owner.clone(), move |subject: &str, key: &str| {
            Some(MetadataValue::provided(owner.clone(), key, subject.to_uppercase()))
        }))
    }

    #[test]
    fn test_fn_provider() {
        let provider = upper(owner("x"));

        let value = provider.value("foo", "upper").unwrap();
        assert_eq!(value.as_string(), "FOO");
        assert_eq!(value.provider_key(), Some("upper"));
        assert_eq!(provider.owner().name(), "x");
    }

    #[test]
    fn test_register_once() {
        let mut registry = ProviderRegistry::new();

        assert!(registry.register("upper", upper(owner("x"))));
        assert!(!registry.register("upper", upper(owner("y"))));
        assert_eq!(registry.len(), 1);

        // The first provider is kept
        let kept = registry.get("upper").unwrap();
        assert_eq!(kept.owner().name(), "x");
    }

    #[test]
    fn test_register_empty_key() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.register("", upper(owner("x"))));
        assert!(registry.get("").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = ProviderRegistry::new();
        registry.register("upper", upper(owner("x")));

        assert!(registry.unregister("upper"));
        assert!(!registry.unregister("upper"));
        assert!(registry.get("upper").is_none());
    }

    #[test]
    fn test_keys_in_registration_order() {
        let mut registry = ProviderRegistry::new();
        registry.register("b", upper(owner("x")));
        registry.register("a", upper(owner("y")));
        registry.register("c", upper(owner("x")));

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);

        assert_eq!(registry.unregister_owner(&owner("x")), 2);
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}
