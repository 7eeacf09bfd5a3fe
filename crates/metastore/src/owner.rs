//! Owner identities.
//!
//! Every stored value belongs to exactly one [`Owner`]. Hosts typically mint
//! one owner per loaded extension and hand it to that extension.

use std::fmt;
use std::sync::Arc;

use crate::error::{MetadataError, Result};

/// Opaque, comparable identity of whoever set a metadata value.
///
/// Cloning is cheap; equality compares names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Owner(Arc<str>);

impl Owner {
    /// Create an owner identity. Blank names are rejected.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(MetadataError::invalid_argument("Owner cannot be blank"));
        }
        Ok(Self(Arc::from(name)))
    }

    /// Name of this owner.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
