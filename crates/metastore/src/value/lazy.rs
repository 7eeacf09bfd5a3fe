//! Lazily computed values.

use std::fmt;

use parking_lot::Mutex;
use serde_json::Value;

/// Closure producing a lazy value.
pub type ComputeFn = Box<dyn Fn() -> Value + Send + Sync>;

/// How a [`LazyValue`] keeps its computed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheStrategy {
    /// Compute on first access, keep until invalidated.
    #[default]
    AfterFirstEval,
    /// Compute on every access; nothing is kept.
    Never,
    /// Compute on first access and keep forever; invalidation is ignored.
    Eternally,
}

/// A value computed on demand and cached according to its [`CacheStrategy`].
///
/// Starts invalid. Reading an invalid value runs the compute closure and
/// caches the result; [`LazyValue::invalidate`] drops the cached result so the
/// next read computes again.
///
/// The closure runs while this value's lock is held and must not read the
/// same value again.
pub struct LazyValue {
    compute: ComputeFn,
    strategy: CacheStrategy,
    cached: Mutex<Option<Value>>,
}

impl LazyValue {
    /// Create a lazy value cached after its first evaluation.
    pub fn new(compute: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::with_strategy(CacheStrategy::default(), compute)
    }

    /// Create a lazy value with an explicit cache strategy.
    pub fn with_strategy(
        strategy: CacheStrategy,
        compute: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            compute: Box::new(compute),
            strategy,
            cached: Mutex::new(None),
        }
    }

    /// The cache strategy of this value.
    pub fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    /// Whether a computed result is currently cached.
    pub fn is_valid(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Run `f` against the current value, computing it first if needed.
    pub fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        if self.strategy == CacheStrategy::Never {
            return f(&(self.compute)());
        }

        let mut cached = self.cached.lock();
        let value = cached.get_or_insert_with(|| (self.compute)());
        f(value)
    }

    /// Drop the cached result. No-op for [`CacheStrategy::Eternally`].
    pub fn invalidate(&self) {
        if self.strategy != CacheStrategy::Eternally {
            *self.cached.lock() = None;
        }
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("strategy", &self.strategy)
            .field("cached", &*self.cached.lock())
            .finish_non_exhaustive()
    }
}
