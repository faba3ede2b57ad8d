//! # CityBike Algorithms
//!
//! Hand-written ordering and lookup routines used across the pipeline in place
//! of the standard library's built-ins.
//!
//! ## Architectural Principles
//!
//! - **Layer 0 Logic:** No dependencies on any other crate in the workspace. Records
//!   are opaque; only a caller-supplied key function is ever inspected.
//! - **Copies, not mutation:** Sorting returns a new `Vec`. The caller's slice is
//!   never reordered, so a failing key function leaves no partial state behind.
//!
//! ## Public API
//!
//! - `merge_sort_by_key` / `merge_sort_by_key_ordered` / `merge_sort_by`: stable merge sort.
//! - `try_merge_sort_by_key`: the same sort for fallible key functions.
//! - `binary_search_by_key` / `find_by_key`: first-match binary search over sorted data.
//! - `try_binary_search_by_key` / `try_find_by_key`: the fallible variants.
//! - `SortOrder`: ascending or descending.

pub mod search;
pub mod sort;

pub use search::{binary_search_by_key, find_by_key, try_binary_search_by_key, try_find_by_key};
pub use sort::{
    SortOrder, is_sorted_by_key, merge_sort_by, merge_sort_by_key, merge_sort_by_key_ordered,
    try_merge_sort_by_key,
};
