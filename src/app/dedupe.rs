//! Order-preserving deduplication
//!
//! Topic lists arrive with repeated entries. Deduplication keeps the first
//! occurrence of each record and drops later exact duplicates.

use std::collections::HashSet;
use std::hash::Hash;

/// Remove duplicates, keeping first-seen order
///
/// Single pass over the input with a seen-set. The result is idempotent:
/// deduplicating it again returns an equal sequence.
pub fn dedupe<T>(records: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    records.iter().cloned().uniqued()
}

/// Iterator extension collecting unique items in first-seen order
pub trait Uniqued: Iterator {
    /// Collect the iterator, skipping items equal to one already seen
    fn uniqued(self) -> Vec<Self::Item>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        let mut seen = HashSet::new();
        self.filter(|item| seen.insert(item.clone())).collect()
    }
}

impl<I: Iterator> Uniqued for I {}
