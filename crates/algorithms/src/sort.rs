//! Stable top-down merge sort.
//!
//! ## Design notes
//!
//! * Keys are extracted exactly once per record, before any comparison happens.
//! * The sort reorders a permutation of indices and clones records into the
//!   output only at the end. The input slice is never touched.
//! * On equal keys the merge always takes the element from the left half, which
//!   keeps equal-keyed records in input order (ascending and descending alike).
//!
//! ## Invariants
//!
//! * The output is a permutation of the input.
//! * O(n log n) comparisons for every input distribution, O(n) extra space.

use std::cmp::Ordering;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Applies the direction to an ascending comparison result.
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Returns a copy of `records` ordered by the key, ascending and stable.
///
/// # Examples
///
/// ```
/// use algorithms::merge_sort_by_key;
///
/// let ids = [3, 1, 2, 1];
/// assert_eq!(merge_sort_by_key(&ids, |id| *id), vec![1, 1, 2, 3]);
/// ```
pub fn merge_sort_by_key<T, K, F>(records: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    merge_sort_by_key_ordered(records, key, SortOrder::Ascending)
}

/// Returns a copy of `records` ordered by the key in the given direction.
///
/// Descending order is stable too: records with equal keys keep their input order.
pub fn merge_sort_by_key_ordered<T, K, F>(records: &[T], key: F, order: SortOrder) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let keys: Vec<K> = records.iter().map(key).collect();
    let permutation = sorted_permutation(keys.len(), |a, b| order.apply(keys[a].cmp(&keys[b])));
    gather(records, permutation)
}

/// Returns a copy of `records` ordered by a comparator.
///
/// The comparator must describe a total order; the left record wins on `Equal`.
pub fn merge_sort_by<T, F>(records: &[T], mut compare: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let permutation = sorted_permutation(records.len(), |a, b| compare(&records[a], &records[b]));
    gather(records, permutation)
}

/// Sorts with a key function that can fail.
///
/// All keys are extracted before any ordering work starts. The first extraction
/// error is returned as-is and no output is produced.
pub fn try_merge_sort_by_key<T, K, E, F>(records: &[T], key: F) -> Result<Vec<T>, E>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> Result<K, E>,
{
    let keys = records.iter().map(key).collect::<Result<Vec<K>, E>>()?;
    let permutation = sorted_permutation(keys.len(), |a, b| keys[a].cmp(&keys[b]));
    Ok(gather(records, permutation))
}

/// Checks whether `records` are already ordered by the key in the given direction.
pub fn is_sorted_by_key<T, K, F>(records: &[T], mut key: F, order: SortOrder) -> bool
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut previous: Option<K> = None;
    for record in records {
        let current = key(record);
        if let Some(prev) = &previous {
            if order.apply(prev.cmp(&current)) == Ordering::Greater {
                return false;
            }
        }
        previous = Some(current);
    }
    true
}

fn gather<T: Clone>(records: &[T], permutation: Vec<usize>) -> Vec<T> {
    permutation.into_iter().map(|i| records[i].clone()).collect()
}

/// Produces the stable sorting permutation of `0..len` under `compare`.
fn sorted_permutation<F>(len: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut permutation: Vec<usize> = (0..len).collect();
    let mut scratch = Vec::with_capacity(len);
    sort_range(&mut permutation, &mut scratch, &mut compare);
    permutation
}

fn sort_range<F>(range: &mut [usize], scratch: &mut Vec<usize>, compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    if range.len() <= 1 {
        return;
    }

    let middle = range.len() / 2;
    sort_range(&mut range[..middle], scratch, compare);
    sort_range(&mut range[middle..], scratch, compare);
    merge(range, middle, scratch, compare);
}

/// Merges the two ordered halves `range[..middle]` and `range[middle..]` in place.
fn merge<F>(range: &mut [usize], middle: usize, scratch: &mut Vec<usize>, compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    // Already in order: the last of the left half does not exceed the first of the right.
    if compare(range[middle - 1], range[middle]) != Ordering::Greater {
        return;
    }

    scratch.clear();
    let (mut left, mut right) = (0, middle);

    while left < middle && right < range.len() {
        if compare(range[left], range[right]) != Ordering::Greater {
            scratch.push(range[left]);
            left += 1;
        } else {
            scratch.push(range[right]);
            right += 1;
        }
    }

    scratch.extend_from_slice(&range[left..middle]);
    scratch.extend_from_slice(&range[right..]);
    range.copy_from_slice(scratch.as_slice());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: u32,
        tag: char,
    }

    fn rec(id: u32, tag: char) -> Rec {
        Rec { id, tag }
    }

    #[test]
    fn sorts_the_reference_scenario_stably() {
        let records = vec![rec(3, 'a'), rec(1, 'b'), rec(2, 'c'), rec(1, 'd')];
        let sorted = merge_sort_by_key(&records, |r| r.id);
        assert_eq!(sorted, vec![rec(1, 'b'), rec(1, 'd'), rec(2, 'c'), rec(3, 'a')]);
        // The input is left untouched.
        assert_eq!(records[0], rec(3, 'a'));
    }

    #[test]
    fn empty_and_single_inputs() {
        let empty: Vec<u8> = Vec::new();
        assert!(merge_sort_by_key(&empty, |v| *v).is_empty());
        assert_eq!(merge_sort_by_key(&[7], |v| *v), vec![7]);
    }

    #[test]
    fn descending_keeps_equal_keys_in_input_order() {
        let records = vec![rec(1, 'a'), rec(2, 'b'), rec(1, 'c'), rec(2, 'd')];
        let sorted = merge_sort_by_key_ordered(&records, |r| r.id, SortOrder::Descending);
        assert_eq!(sorted, vec![rec(2, 'b'), rec(2, 'd'), rec(1, 'a'), rec(1, 'c')]);
    }

    #[test]
    fn comparator_form_matches_key_form() {
        let values = vec![5, -3, 9, 0, -3, 2];
        let by_key = merge_sort_by_key(&values, |v| *v);
        let by_cmp = merge_sort_by(&values, |a, b| a.cmp(b));
        assert_eq!(by_key, by_cmp);
    }

    #[test]
    fn key_is_called_once_per_record() {
        let values: Vec<u32> = (0..100).rev().collect();
        let mut calls = 0;
        let _ = merge_sort_by_key(&values, |v| {
            calls += 1;
            *v
        });
        assert_eq!(calls, values.len());
    }

    #[test]
    fn fallible_key_propagates_first_error() {
        let raw = vec!["3", "x", "1", "y"];
        let result = try_merge_sort_by_key(&raw, |s| s.parse::<u32>().map_err(|_| s.to_string()));
        assert_eq!(result, Err("x".to_string()));

        let raw = vec!["3", "10", "1"];
        let sorted = try_merge_sort_by_key(&raw, |s| s.parse::<u32>()).unwrap();
        assert_eq!(sorted, vec!["1", "3", "10"]);
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted_by_key(&[1, 1, 2, 5], |v| *v, SortOrder::Ascending));
        assert!(!is_sorted_by_key(&[1, 3, 2], |v| *v, SortOrder::Ascending));
        assert!(is_sorted_by_key(&[5, 2, 2, 0], |v| *v, SortOrder::Descending));
        assert!(is_sorted_by_key::<u8, u8, _>(&[], |v| *v, SortOrder::Ascending));
    }
}
