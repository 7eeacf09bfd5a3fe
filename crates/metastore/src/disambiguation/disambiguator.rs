//! The host-supplied function naming a (subject, key) pair.

use std::fmt::Display;

/// Produces the canonical storage key for a subject and metadata key.
///
/// Implementations must return the same string for any two subjects the
/// host considers equal, and different strings for different subjects.
/// Two player handles for the same player must yield the same key even if
/// they are distinct allocations.
pub trait Disambiguator<S: ?Sized>: Send + Sync {
    fn disambiguate(&self, subject: &S, key: &str) -> String;
}

impl<S, F> Disambiguator<S> for F
where
    S: ?Sized,
    F: Fn(&S, &str) -> String + Send + Sync,
{
    fn disambiguate(&self, subject: &S, key: &str) -> String {
        self(subject, key)
    }
}

/// Joins the subject's `Display` form and the key as `"{subject}:{key}"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayDisambiguator;

impl<S: ?Sized + Display> Disambiguator<S> for DisplayDisambiguator {
    fn disambiguate(&self, subject: &S, key: &str) -> String {
        format!("{subject}:{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_disambiguator() {
        assert_eq!(DisplayDisambiguator.disambiguate("p1", "age"), "p1:age");
        assert_eq!(DisplayDisambiguator.disambiguate(&42u32, "hp"), "42:hp");
    }

    #[test]
    fn test_closure_disambiguator() {
        let by_len = |subject: &str, key: &str| format!("{}#{key}", subject.len());
        assert_eq!(by_len.disambiguate("abc", "k"), "3#k");
    }
}
