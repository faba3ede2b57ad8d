use crate::error::BenchmarkError;
use algorithms::{binary_search_by_key, merge_sort_by_key};
use serde::Serialize;
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

/// What a `BenchmarkResult` measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Sort,
    Search,
    SortAndSearch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Sort => "sort",
            Operation::Search => "search",
            Operation::SortAndSearch => "sort + search",
        };
        f.write_str(name)
    }
}

/// The outcome of timing the hand-written path against the standard library one.
///
/// Durations are averages over all runs of the harness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    operation: Operation,
    #[serde(with = "humantime_serde")]
    custom_elapsed: Duration,
    #[serde(with = "humantime_serde")]
    reference_elapsed: Duration,
    records_processed: usize,
    runs: u32,
    outputs_equal: bool,
    optimized_build: bool,
}

impl BenchmarkResult {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn custom_elapsed(&self) -> Duration {
        self.custom_elapsed
    }

    pub fn reference_elapsed(&self) -> Duration {
        self.reference_elapsed
    }

    pub fn records_processed(&self) -> usize {
        self.records_processed
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Whether both paths produced the same sorted records and the same match.
    pub fn outputs_equal(&self) -> bool {
        self.outputs_equal
    }

    /// Whether the timings come from a build without debug assertions.
    ///
    /// In a debug build the binary search re-checks that its input is sorted,
    /// which is a linear scan, so search timings are not comparable.
    pub fn optimized_build(&self) -> bool {
        self.optimized_build
    }

    /// Custom time divided by reference time; `None` when the reference took no
    /// measurable time.
    pub fn speed_ratio(&self) -> Option<f64> {
        let reference = self.reference_elapsed.as_secs_f64();
        (reference > 0.0).then(|| self.custom_elapsed.as_secs_f64() / reference)
    }
}

/// Times the merge sort and the binary search against `slice::sort_by_key` and a
/// linear scan.
///
/// The harness only ever reads its inputs and keeps no state between calls.
/// Meaningful timings need a release build; see
/// [`BenchmarkResult::optimized_build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkHarness {
    runs: u32,
}

impl BenchmarkHarness {
    pub fn new(runs: usize) -> Result<Self, BenchmarkError> {
        match u32::try_from(runs) {
            Ok(runs) if runs > 0 => Ok(Self { runs }),
            _ => Err(BenchmarkError::InvalidRuns(runs)),
        }
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Sorts `records` by `key` and looks up `target` in the sorted records, once
    /// with the hand-written algorithms and once with the reference path.
    pub fn compare<T, K, F>(&self, records: &[T], mut key: F, target: &K) -> BenchmarkResult
    where
        T: Clone + PartialEq,
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let ((custom_sorted, custom_index), custom_elapsed) = self.time(|| {
            let sorted = merge_sort_by_key(records, &mut key);
            let index = binary_search_by_key(&sorted, target, &mut key);
            (sorted, index)
        });

        let ((reference_sorted, reference_index), reference_elapsed) = self.time(|| {
            let sorted = reference_sort(records, &mut key);
            let index = linear_search(&sorted, target, &mut key);
            (sorted, index)
        });

        self.finish(
            Operation::SortAndSearch,
            records.len(),
            (custom_elapsed, reference_elapsed),
            custom_sorted == reference_sorted && custom_index == reference_index,
        )
    }

    pub fn compare_sort<T, K, F>(&self, records: &[T], mut key: F) -> BenchmarkResult
    where
        T: Clone + PartialEq,
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let (custom, custom_elapsed) = self.time(|| merge_sort_by_key(records, &mut key));
        let (reference, reference_elapsed) = self.time(|| reference_sort(records, &mut key));

        self.finish(
            Operation::Sort,
            records.len(),
            (custom_elapsed, reference_elapsed),
            custom == reference,
        )
    }

    /// `ordered` must already be sorted ascending by `key`.
    pub fn compare_search<T, K, F>(&self, ordered: &[T], mut key: F, target: &K) -> BenchmarkResult
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let (custom, custom_elapsed) =
            self.time(|| binary_search_by_key(ordered, target, &mut key));
        let (reference, reference_elapsed) = self.time(|| linear_search(ordered, target, &mut key));

        self.finish(
            Operation::Search,
            ordered.len(),
            (custom_elapsed, reference_elapsed),
            custom == reference,
        )
    }

    /// Runs `op` `self.runs` times and returns the last output with the average time.
    fn time<R>(&self, mut op: impl FnMut() -> R) -> (R, Duration) {
        let start = Instant::now();
        let mut output = op();
        for _ in 1..self.runs {
            output = black_box(op());
        }
        (output, start.elapsed() / self.runs)
    }

    fn finish(
        &self,
        operation: Operation,
        records_processed: usize,
        (custom_elapsed, reference_elapsed): (Duration, Duration),
        outputs_equal: bool,
    ) -> BenchmarkResult {
        if !outputs_equal {
            tracing::warn!(%operation, "custom and reference outputs differ");
        }
        tracing::debug!(
            %operation,
            records = records_processed,
            runs = self.runs,
            custom = ?custom_elapsed,
            reference = ?reference_elapsed,
            "benchmark finished"
        );

        BenchmarkResult {
            operation,
            custom_elapsed,
            reference_elapsed,
            records_processed,
            runs: self.runs,
            outputs_equal,
            optimized_build: !cfg!(debug_assertions),
        }
    }
}

fn reference_sort<T, K, F>(records: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut sorted = records.to_vec();
    sorted.sort_by_key(key);
    sorted
}

fn linear_search<T, K, F>(records: &[T], target: &K, mut key: F) -> Option<usize>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    records.iter().position(|r| key(r) == *target)
}
