//! Metastore: owner-scoped metadata attached to externally owned subjects.
//!
//! Independent owners (typically extensions loaded by a host application)
//! attach named values to shared objects without modifying those objects.
//!
//! # Core Principles
//!
//! - **Owner-scoped**: each owner holds at most one value per subject and key
//! - **Non-intrusive**: subjects are never modified and never kept alive
//! - **Lazy**: values may be computed on access or supplied by a provider
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metastore::{DisplayDisambiguator, MetadataStore, MetadataValue, Owner};
//!
//! let store = MetadataStore::new(DisplayDisambiguator);
//! let owner = Owner::new("my-extension").unwrap();
//! let player: Arc<str> = Arc::from("steve");
//!
//! store.set_metadata(&player, "kills", MetadataValue::fixed(owner.clone(), 3));
//!
//! let values = store.get_metadata(&player, "kills");
//! assert_eq!(values.len(), 1);
//! assert_eq!(values[0].as_int(), 3);
//! ```

pub mod config;
pub mod disambiguation;
pub mod error;
pub mod owner;
pub mod provider;
pub mod value;

mod store;

pub use config::{DisambiguationMode, StoreConfig};
pub use disambiguation::{DisambiguationCache, Disambiguator, DisplayDisambiguator};
pub use error::{MetadataError, Result};
pub use owner::Owner;
pub use provider::{FnProvider, MetadataProvider, ProviderRegistry};
pub use store::{MetadataList, MetadataStore, StoreStats};
pub use value::{CacheStrategy, LazyValue, MetadataValue, ValueVariant};
