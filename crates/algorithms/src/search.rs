//! First-match binary search over key-ordered data.
//!
//! The input must already be sorted ascending by the same key function that is
//! passed here. This is the caller's responsibility: debug builds assert it,
//! release builds do not check it and return an unspecified result when it is
//! violated.
//!
//! When several records share the target key the lowest index wins. Paired with
//! the stable sort this is the first matching record in original input order.

use crate::sort::{SortOrder, is_sorted_by_key};
use std::cmp::Ordering;

/// Returns the index of the first record whose key equals `target`.
///
/// `None` means the key is absent, which is a normal outcome.
///
/// Runs in O(log n) key comparisons in release builds. Debug builds add the
/// O(n) sortedness assertion, so time this only in an optimized build.
///
/// # Examples
///
/// ```
/// use algorithms::binary_search_by_key;
///
/// let sorted = [1, 1, 2, 3];
/// assert_eq!(binary_search_by_key(&sorted, &1, |v| *v), Some(0));
/// assert_eq!(binary_search_by_key(&sorted, &9, |v| *v), None);
/// ```
pub fn binary_search_by_key<T, K, F>(ordered: &[T], target: &K, mut key: F) -> Option<usize>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    debug_assert!(
        is_sorted_by_key(ordered, &mut key, SortOrder::Ascending),
        "binary search requires input sorted ascending by the search key"
    );

    let (mut low, mut high) = (0, ordered.len());
    let mut found = None;

    while low < high {
        let middle = low + (high - low) / 2;
        match key(&ordered[middle]).cmp(target) {
            Ordering::Less => low = middle + 1,
            Ordering::Greater => high = middle,
            Ordering::Equal => {
                // Keep bisecting the left half for an earlier match.
                found = Some(middle);
                high = middle;
            }
        }
    }

    found
}

/// Returns the first record whose key equals `target`.
pub fn find_by_key<'a, T, K, F>(ordered: &'a [T], target: &K, key: F) -> Option<&'a T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    binary_search_by_key(ordered, target, key).map(|index| &ordered[index])
}

/// Binary search with a key function that can fail.
///
/// A key error is returned as `Err`, distinct from `Ok(None)` for an absent key.
/// Only the keys on the search path are extracted, so the sortedness
/// precondition is not asserted here.
pub fn try_binary_search_by_key<T, K, E, F>(
    ordered: &[T],
    target: &K,
    mut key: F,
) -> Result<Option<usize>, E>
where
    K: Ord,
    F: FnMut(&T) -> Result<K, E>,
{
    let (mut low, mut high) = (0, ordered.len());
    let mut found = None;

    while low < high {
        let middle = low + (high - low) / 2;
        match key(&ordered[middle])?.cmp(target) {
            Ordering::Less => low = middle + 1,
            Ordering::Greater => high = middle,
            Ordering::Equal => {
                found = Some(middle);
                high = middle;
            }
        }
    }

    Ok(found)
}

pub fn try_find_by_key<'a, T, K, E, F>(
    ordered: &'a [T],
    target: &K,
    key: F,
) -> Result<Option<&'a T>, E>
where
    K: Ord,
    F: FnMut(&T) -> Result<K, E>,
{
    Ok(try_binary_search_by_key(ordered, target, key)?.map(|index| &ordered[index]))
}
