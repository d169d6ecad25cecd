//! Suffix array over a flat token sequence.
//!
//! The array indexes one whole corpus as a single sequence of token codes
//! (sentence boundaries are not delimited) and answers "how many times does
//! this contiguous subsequence occur" by binary search. Construction sorts
//! the start positions of all suffixes; for dense integer codes a
//! prefix-doubling sort is available that avoids the potentially long
//! suffix comparisons of a generic sort.

use crate::types::{SortAlgorithm, TokenCode};
use std::cmp::Ordering;

/// A suffix array: the owned data sequence plus its start positions,
/// permuted into lexicographic order of the suffixes beginning there.
#[derive(Debug, Clone)]
pub struct SuffixArray<T> {
    data: Vec<T>,
    order: Vec<usize>,
}

impl<T: Ord> SuffixArray<T> {
    /// Build a suffix array with a generic comparison sort.
    pub fn new(data: Vec<T>) -> Self {
        let mut order: Vec<usize> = (0..data.len()).collect();
        order.sort_unstable_by(|&a, &b| data[a..].cmp(&data[b..]));

        Self { data, order }
    }

    /// The data sequence backing this suffix array.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The sorted start positions. Always a permutation of `0..data.len()`.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of indexed suffixes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the indexed sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Count the occurrences of `pattern` as a contiguous subsequence of
    /// the data.
    ///
    /// A pattern longer than any suffix yields 0. The empty pattern has no
    /// meaningful occurrence count and is rejected.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn find(&self, pattern: &[T]) -> usize {
        assert!(!pattern.is_empty(), "cannot search for an empty pattern");

        let lower = self
            .order
            .partition_point(|&start| self.cmp_prefix(start, pattern) == Ordering::Less);
        let upper = self
            .order
            .partition_point(|&start| self.cmp_prefix(start, pattern) != Ordering::Greater);

        upper - lower
    }

    // Compare the suffix at `start`, truncated to the pattern length,
    // against the pattern. A shorter suffix that is a prefix of the
    // pattern compares as less.
    fn cmp_prefix(&self, start: usize, pattern: &[T]) -> Ordering {
        let end = (start + pattern.len()).min(self.data.len());
        self.data[start..end].cmp(pattern)
    }
}

impl SuffixArray<TokenCode> {
    /// Build a suffix array over token codes with a selectable sort
    /// algorithm. Both algorithms produce the identical array.
    pub fn with_algorithm(data: Vec<TokenCode>, algorithm: SortAlgorithm) -> Self {
        match algorithm {
            SortAlgorithm::Comparison => Self::new(data),
            SortAlgorithm::PrefixDoubling => {
                let order = prefix_doubling(&data);
                Self { data, order }
            }
        }
    }
}

/// Manber–Myers prefix doubling: sort suffixes by their first `k` elements,
/// doubling `k` each round, with two bucket-sort passes per round. Each
/// round is linear in the sequence length, so construction is
/// O(n log n) regardless of how long shared prefixes are.
fn prefix_doubling(data: &[TokenCode]) -> Vec<usize> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    // Round 0: order and rank suffixes by their first element.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by_key(|&i| data[i]);

    let mut rank = vec![0usize; n];
    for w in 1..n {
        rank[order[w]] =
            rank[order[w - 1]] + usize::from(data[order[w]] != data[order[w - 1]]);
    }

    let mut k = 1;
    while k < n && rank[order[n - 1]] + 1 < n {
        // Key of suffix i this round is (rank[i], second(i)); second is 0
        // when i + k runs off the end, which sorts shorter suffixes first.
        let second = |i: usize| if i + k < n { rank[i + k] + 1 } else { 0 };

        // Bucket sort by the second key...
        let mut buckets = vec![0usize; n + 2];
        for i in 0..n {
            buckets[second(i) + 1] += 1;
        }
        for b in 1..buckets.len() {
            buckets[b] += buckets[b - 1];
        }
        let mut by_second = vec![0usize; n];
        for i in 0..n {
            by_second[buckets[second(i)]] = i;
            buckets[second(i)] += 1;
        }

        // ...then a stable bucket sort by the first key.
        let mut buckets = vec![0usize; n + 1];
        for i in 0..n {
            buckets[rank[i] + 1] += 1;
        }
        for b in 1..buckets.len() {
            buckets[b] += buckets[b - 1];
        }
        for &i in &by_second {
            order[buckets[rank[i]]] = i;
            buckets[rank[i]] += 1;
        }

        let mut next_rank = vec![0usize; n];
        for w in 1..n {
            let (a, b) = (order[w - 1], order[w]);
            next_rank[b] =
                next_rank[a] + usize::from((rank[a], second(a)) != (rank[b], second(b)));
        }
        rank = next_rank;

        k *= 2;
    }

    order
}
