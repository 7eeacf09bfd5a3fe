//! Subject/key disambiguation.
//!
//! The store files every value under a single string built from the subject
//! and the metadata key. Building that string may be costly, so
//! [`DisambiguationCache`] remembers it per live subject.

mod cache;
mod disambiguator;

pub use cache::DisambiguationCache;
pub use disambiguator::{Disambiguator, DisplayDisambiguator};
