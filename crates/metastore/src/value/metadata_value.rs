//! The owner-tagged value held by the store.

use serde_json::Value;

use crate::owner::Owner;

use super::coerce;
use super::lazy::{CacheStrategy, LazyValue};

/// Which kind of value a [`MetadataValue`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueVariant {
    /// Set once, never changes.
    Fixed,
    /// Computed on access, see [`LazyValue`].
    Lazy,
    /// Produced by a registered provider.
    Provided,
}

#[derive(Debug)]
enum ValueKind {
    Fixed(Value),
    Lazy(LazyValue),
    Provided { key: String, value: Value },
}

/// A metadata value and the [`Owner`] that set it.
///
/// All variants share the same coercing accessors. Fixed and provided values
/// are always valid and ignore [`MetadataValue::invalidate`].
#[derive(Debug)]
pub struct MetadataValue {
    owner: Owner,
    kind: ValueKind,
}

impl MetadataValue {
    /// A value that never changes.
    pub fn fixed(owner: Owner, value: impl Into<Value>) -> Self {
        Self {
            owner,
            kind: ValueKind::Fixed(value.into()),
        }
    }

    /// A value computed on first access and cached until invalidated.
    pub fn lazy(owner: Owner, compute: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::from_lazy(owner, LazyValue::new(compute))
    }

    /// A lazily computed value with an explicit cache strategy.
    pub fn lazy_with_strategy(
        owner: Owner,
        strategy: CacheStrategy,
        compute: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::from_lazy(owner, LazyValue::with_strategy(strategy, compute))
    }

    /// Wrap an existing [`LazyValue`].
    pub fn from_lazy(owner: Owner, lazy: LazyValue) -> Self {
        Self {
            owner,
            kind: ValueKind::Lazy(lazy),
        }
    }

    /// A value materialized by the provider registered under `key`.
    pub fn provided(owner: Owner, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            owner,
            kind: ValueKind::Provided {
                key: key.into(),
                value: value.into(),
            },
        }
    }

    /// The owner that set this value.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Which kind of value this is.
    pub fn variant(&self) -> ValueVariant {
        match self.kind {
            ValueKind::Fixed(_) => ValueVariant::Fixed,
            ValueKind::Lazy(_) => ValueVariant::Lazy,
            ValueKind::Provided { .. } => ValueVariant::Provided,
        }
    }

    /// Provider key for provided values.
    pub fn provider_key(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Provided { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether reading this value returns a cached result without computing.
    pub fn is_valid(&self) -> bool {
        match &self.kind {
            ValueKind::Lazy(lazy) => lazy.is_valid(),
            ValueKind::Fixed(_) | ValueKind::Provided { .. } => true,
        }
    }

    /// Discard any cached result. Only lazy values are affected.
    pub fn invalidate(&self) {
        if let ValueKind::Lazy(lazy) = &self.kind {
            lazy.invalidate();
        }
    }

    fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        match &self.kind {
            ValueKind::Fixed(value) | ValueKind::Provided { value, .. } => f(value),
            ValueKind::Lazy(lazy) => lazy.with_value(f),
        }
    }

    /// The raw value.
    pub fn value(&self) -> Value {
        self.with_value(Value::clone)
    }

    /// The value as text, see [`coerce::to_string`].
    pub fn as_string(&self) -> String {
        self.with_value(coerce::to_string)
    }

    /// The value as an `i32`, see [`coerce::to_int`].
    pub fn as_int(&self) -> i32 {
        self.with_value(coerce::to_int)
    }

    /// The value as an `i64`, see [`coerce::to_long`].
    pub fn as_long(&self) -> i64 {
        self.with_value(coerce::to_long)
    }

    /// The value as an `f32`, see [`coerce::to_float`].
    pub fn as_float(&self) -> f32 {
        self.with_value(coerce::to_float)
    }

    /// The value as an `f64`, see [`coerce::to_double`].
    pub fn as_double(&self) -> f64 {
        self.with_value(coerce::to_double)
    }

    /// The value as a `bool`, see [`coerce::to_boolean`].
    pub fn as_boolean(&self) -> bool {
        self.with_value(coerce::to_boolean)
    }
}
