//! Metadata values and their coercion rules.
//!
//! A [`MetadataValue`] is one of three variants:
//! - **Fixed** - set once and never recomputed
//! - **Lazy** - computed on access and cached per its [`CacheStrategy`]
//! - **Provided** - materialized by a registered provider
//!
//! Every variant exposes the same lenient accessors (`as_string`, `as_int`,
//! `as_long`, `as_float`, `as_double`, `as_boolean`), see [`coerce`].

pub mod coerce;
mod lazy;
mod metadata_value;

pub use lazy::{CacheStrategy, ComputeFn, LazyValue};
pub use metadata_value::{MetadataValue, ValueVariant};
