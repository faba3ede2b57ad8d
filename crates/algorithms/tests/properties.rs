//! Property tests for the merge sort and the first-match binary search.
//!
//! Records are `(key, original_position)` pairs so that stability can be
//! observed directly in the output.

use algorithms::{
    SortOrder, binary_search_by_key, find_by_key, is_sorted_by_key, merge_sort_by_key,
    merge_sort_by_key_ordered,
};
use proptest::prelude::*;

fn tagged(keys: &[i16]) -> Vec<(i16, usize)> {
    keys.iter().copied().enumerate().map(|(i, k)| (k, i)).collect()
}

fn small_keys() -> impl Strategy<Value = Vec<i16>> {
    // A narrow key range forces plenty of duplicates.
    prop::collection::vec(-20i16..20, 0..200)
}

proptest! {
    #[test]
    fn output_is_a_permutation(keys in small_keys()) {
        let records = tagged(&keys);
        let sorted = merge_sort_by_key(&records, |r| r.0);

        let mut expected = records.clone();
        expected.sort();
        let mut actual = sorted.clone();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn output_is_non_decreasing(keys in small_keys()) {
        let sorted = merge_sort_by_key(&tagged(&keys), |r| r.0);
        prop_assert!(sorted.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn equal_keys_keep_input_order(keys in small_keys()) {
        let sorted = merge_sort_by_key(&tagged(&keys), |r| r.0);
        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                prop_assert!(pair[0].1 < pair[1].1);
            }
        }
    }

    #[test]
    fn matches_the_standard_stable_sort(keys in small_keys()) {
        let records = tagged(&keys);
        let mut reference = records.clone();
        reference.sort_by_key(|r| r.0);
        prop_assert_eq!(merge_sort_by_key(&records, |r| r.0), reference);
    }

    #[test]
    fn descending_matches_reversed_comparison(keys in small_keys()) {
        let records = tagged(&keys);
        let mut reference = records.clone();
        reference.sort_by(|a, b| b.0.cmp(&a.0));
        let sorted = merge_sort_by_key_ordered(&records, |r| r.0, SortOrder::Descending);
        prop_assert!(is_sorted_by_key(&sorted, |r| r.0, SortOrder::Descending));
        prop_assert_eq!(sorted, reference);
    }

    #[test]
    fn sorting_is_idempotent(keys in small_keys()) {
        let once = merge_sort_by_key(&tagged(&keys), |r| r.0);
        let twice = merge_sort_by_key(&once, |r| r.0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn search_finds_present_keys_first(keys in small_keys(), target in -25i16..25) {
        let sorted = merge_sort_by_key(&tagged(&keys), |r| r.0);
        let found = find_by_key(&sorted, &target, |r| r.0);

        match keys.iter().position(|k| *k == target) {
            Some(first_original) => {
                let record = found.expect("present key must be found");
                prop_assert_eq!(record.0, target);
                prop_assert_eq!(record.1, first_original);
            }
            None => prop_assert!(found.is_none()),
        }
    }

    #[test]
    fn search_index_agrees_with_partition_point(keys in small_keys(), target in -25i16..25) {
        let sorted = merge_sort_by_key(&keys, |k| *k);
        let lower_bound = sorted.partition_point(|k| *k < target);
        let expected = (lower_bound < sorted.len() && sorted[lower_bound] == target)
            .then_some(lower_bound);
        prop_assert_eq!(binary_search_by_key(&sorted, &target, |k| *k), expected);
    }
}

#[test]
fn single_element_sorts_to_itself() {
    let one = vec![("only", 1)];
    assert_eq!(merge_sort_by_key(&one, |r| r.1), one);
}

#[test]
fn large_reversed_input() {
    let values: Vec<u32> = (0..10_000).rev().collect();
    let sorted = merge_sort_by_key(&values, |v| *v);
    assert!(sorted.iter().copied().eq(0..10_000));
}
