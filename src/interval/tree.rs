//! Centered interval tree.
//!
//! Every node owns a median endpoint and the intervals that straddle it.
//! Intervals entirely below the median live in the left subtree, intervals
//! entirely above it in the right subtree, so each interval is stored in
//! exactly one node.
//!
//! Reference: de Berg, van Kreveld, Overmars, Schwarzkopf. *Computational
//! Geometry: Algorithms and Applications*, 212-217.

use crate::error::{IndexError, Result};
use num_traits::Float;
use std::cmp::Ordering;
use std::fmt;

/// A closed interval `[lower, upper]` carrying a payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<F, T> {
    /// Lower bound (inclusive).
    pub lower: F,
    /// Upper bound (inclusive).
    pub upper: F,
    /// Value reported by queries that hit this interval.
    pub payload: T,
}

impl<F: Float, T> Interval<F, T> {
    /// Creates a new interval. Validation happens when it is added to a tree.
    #[inline]
    pub fn new(lower: F, upper: F, payload: T) -> Self {
        Self {
            lower,
            upper,
            payload,
        }
    }

    /// Returns `true` if `lower <= upper` (false for NaN bounds).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lower <= self.upper
    }

    /// Returns `true` if `q` lies inside the interval.
    #[inline]
    pub fn contains(&self, q: F) -> bool {
        self.lower <= q && q <= self.upper
    }

    /// Returns `true` if the interval shares at least one value with `[lo, hi]`.
    #[inline]
    pub fn overlaps(&self, lo: F, hi: F) -> bool {
        !(self.upper < lo || self.lower > hi)
    }
}

impl<F, T> From<(F, F, T)> for Interval<F, T> {
    fn from((lower, upper, payload): (F, F, T)) -> Self {
        Self {
            lower,
            upper,
            payload,
        }
    }
}

/// A stabbing value or a range, accepted by [`IntervalTree::query`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalQuery<F> {
    /// Intervals containing the value.
    Point(F),
    /// Intervals overlapping the closed range.
    Range(F, F),
}

macro_rules! impl_query_from {
    ($($t:ty),*) => {$(
        impl From<$t> for IntervalQuery<$t> {
            #[inline]
            fn from(q: $t) -> Self {
                IntervalQuery::Point(q)
            }
        }

        impl From<($t, $t)> for IntervalQuery<$t> {
            #[inline]
            fn from((lo, hi): ($t, $t)) -> Self {
                IntervalQuery::Range(lo, hi)
            }
        }
    )*};
}

impl_query_from!(f32, f64);

/// A subtree: either terminal or an owned node.
enum Subtree<F, T> {
    Empty,
    Node(Box<Node<F, T>>),
}

/// A tree node and the intervals centered on its median.
struct Node<F, T> {
    median: F,
    /// Centered intervals, unordered storage.
    entries: Vec<Interval<F, T>>,
    /// Indices into `entries`, ascending by lower bound.
    by_lower: Vec<usize>,
    /// Indices into `entries`, descending by upper bound.
    by_upper: Vec<usize>,
    left: Subtree<F, T>,
    right: Subtree<F, T>,
}

impl<F: Float, T> Node<F, T> {
    fn new(median: F, entries: Vec<Interval<F, T>>, left: Subtree<F, T>, right: Subtree<F, T>) -> Self {
        let mut by_lower: Vec<usize> = (0..entries.len()).collect();
        by_lower.sort_by(|&a, &b| {
            entries[a]
                .lower
                .partial_cmp(&entries[b].lower)
                .unwrap_or(Ordering::Equal)
        });

        let mut by_upper: Vec<usize> = (0..entries.len()).collect();
        by_upper.sort_by(|&a, &b| {
            entries[b]
                .upper
                .partial_cmp(&entries[a].upper)
                .unwrap_or(Ordering::Equal)
        });

        Self {
            median,
            entries,
            by_lower,
            by_upper,
            left,
            right,
        }
    }

    /// Appends payloads of centered intervals containing `q`.
    ///
    /// Below the median every centered interval already reaches past `q` on
    /// the right, so only the lower bound matters; the scan stops at the first
    /// lower bound above `q`. The upper-bound list is the mirror case.
    fn stab<'a>(&'a self, q: F, out: &mut Vec<&'a T>) {
        if q < self.median {
            for &i in &self.by_lower {
                let interval = &self.entries[i];
                if interval.lower > q {
                    break;
                }
                out.push(&interval.payload);
            }
        } else {
            for &i in &self.by_upper {
                let interval = &self.entries[i];
                if !(interval.upper >= q) {
                    break;
                }
                out.push(&interval.payload);
            }
        }
    }

    /// Adds an interval that straddles this node's median.
    fn insert(&mut self, interval: Interval<F, T>) {
        let lower_pos = self
            .by_lower
            .partition_point(|&i| self.entries[i].lower <= interval.lower);
        let upper_pos = self
            .by_upper
            .partition_point(|&i| self.entries[i].upper >= interval.upper);

        let index = self.entries.len();
        self.entries.push(interval);
        self.by_lower.insert(lower_pos, index);
        self.by_upper.insert(upper_pos, index);
    }

    /// Removes a centered interval from both sorted lists.
    fn remove(&mut self, lower: F, upper: F, payload: &T) -> Option<Interval<F, T>>
    where
        T: PartialEq,
    {
        let index = self.entries.iter().position(|interval| {
            interval.lower == lower && interval.upper == upper && interval.payload == *payload
        })?;

        let last = self.entries.len() - 1;
        let removed = self.entries.swap_remove(index);

        for list in [&mut self.by_lower, &mut self.by_upper] {
            list.retain(|&i| i != index);
            // swap_remove moved the last entry into the freed slot
            for i in list.iter_mut() {
                if *i == last {
                    *i = index;
                }
            }
        }

        Some(removed)
    }
}

/// A static interval tree answering stabbing and overlap queries.
///
/// # Construction
///
/// The tree is built from the sorted set of distinct endpoints. Each node
/// takes the endpoint at index `len / 2` as its median,
/// keeps the intervals that straddle it and recurses on the endpoints of the
/// intervals entirely to either side.
///
/// # Complexity
///
/// - Construction: O(n log n) for distinct endpoints
/// - Point query: O(log n + k) where k is the number of results
/// - Range query: O(log n + k) on top of the nodes whose median lies in the range
pub struct IntervalTree<F, T> {
    root: Subtree<F, T>,
    len: usize,
}

impl<F: Float, T> IntervalTree<F, T> {
    /// Builds a tree from a batch of intervals.
    ///
    /// Fails with [`IndexError::InvalidInterval`] if any interval has
    /// `lower > upper`; no tree is produced in that case.
    pub fn build<I>(intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Interval<F, T>>,
    {
        let intervals: Vec<Interval<F, T>> = intervals.into_iter().collect();

        let mut invalid = intervals
            .iter()
            .enumerate()
            .filter(|(_, interval)| !interval.is_valid())
            .map(|(i, _)| i);
        if let Some(index) = invalid.next() {
            let count = 1 + invalid.count();
            return Err(IndexError::InvalidInterval { index, count });
        }

        let len = intervals.len();
        let endpoints = sorted_endpoints(&intervals);
        let root = build_recursive(intervals, &endpoints);

        let tree = Self { root, len };
        tracing::debug!(
            intervals = len,
            nodes = tree.node_count(),
            depth = tree.depth(),
            "built interval tree"
        );
        Ok(tree)
    }

    /// Returns the number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from the root to the deepest node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 1)];
        while let Some((subtree, level)) = stack.pop() {
            if let Subtree::Node(node) = subtree {
                deepest = deepest.max(level);
                stack.push((&node.left, level + 1));
                stack.push((&node.right, level + 1));
            }
        }
        deepest
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(subtree) = stack.pop() {
            if let Subtree::Node(node) = subtree {
                count += 1;
                stack.push(&node.left);
                stack.push(&node.right);
            }
        }
        count
    }

    /// All stored intervals, in pre-order node order.
    pub fn intervals(&self) -> Vec<&Interval<F, T>> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![&self.root];
        while let Some(subtree) = stack.pop() {
            if let Subtree::Node(node) = subtree {
                out.extend(node.entries.iter());
                stack.push(&node.right);
                stack.push(&node.left);
            }
        }
        out
    }

    /// Returns the payloads of intervals hit by a value or a range.
    ///
    /// A bare scalar performs a [point query](Self::query_point), a pair a
    /// [range query](Self::query_range).
    pub fn query<Q: Into<IntervalQuery<F>>>(&self, q: Q) -> Vec<&T> {
        match q.into() {
            IntervalQuery::Point(value) => self.query_point(value),
            IntervalQuery::Range(lo, hi) => self.query_range(lo, hi),
        }
    }

    /// Returns the payloads of all intervals containing `q`.
    ///
    /// Results are grouped per visited node from the root down.
    pub fn query_point(&self, q: F) -> Vec<&T> {
        let mut found = Vec::new();
        let mut current = &self.root;
        while let Subtree::Node(node) = current {
            node.stab(q, &mut found);
            current = if q < node.median {
                &node.left
            } else {
                &node.right
            };
        }
        found
    }

    /// Returns the payloads of all intervals overlapping `[lo, hi]`.
    ///
    /// An inverted range (`lo > hi`) is treated as `[hi, lo]`.
    pub fn query_range(&self, lo: F, hi: F) -> Vec<&T> {
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        let mut found = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(subtree) = stack.pop() {
            let node = match subtree {
                Subtree::Empty => continue,
                Subtree::Node(node) => node,
            };

            if node.median < lo {
                node.stab(lo, &mut found);
                stack.push(&node.right);
            } else if node.median > hi {
                node.stab(hi, &mut found);
                stack.push(&node.left);
            } else {
                // Median inside the range: every centered interval overlaps it
                node.stab(node.median, &mut found);
                stack.push(&node.right);
                stack.push(&node.left);
            }
        }
        found
    }

    /// Adds one interval without rebalancing.
    ///
    /// The interval is stored in the first node on its descent whose median
    /// it straddles; a new leaf centered on its lower bound is created when
    /// none does.
    pub fn insert(&mut self, interval: Interval<F, T>) -> Result<()> {
        if !interval.is_valid() {
            return Err(IndexError::InvalidInterval { index: 0, count: 1 });
        }
        self.len += 1;

        let mut current = &mut self.root;
        while let Subtree::Node(node) = current {
            if interval.upper < node.median {
                current = &mut node.left;
            } else if interval.lower > node.median {
                current = &mut node.right;
            } else {
                node.insert(interval);
                return Ok(());
            }
        }

        let median = interval.lower;
        *current = Subtree::Node(Box::new(Node::new(
            median,
            vec![interval],
            Subtree::Empty,
            Subtree::Empty,
        )));
        Ok(())
    }

    /// Removes the interval matching all of `lower`, `upper` and `payload`.
    ///
    /// Fails with [`IndexError::NotFound`] if no such interval is stored.
    pub fn remove(&mut self, lower: F, upper: F, payload: &T) -> Result<Interval<F, T>>
    where
        T: PartialEq,
    {
        let mut current = &mut self.root;
        while let Subtree::Node(node) = current {
            if upper < node.median {
                current = &mut node.left;
            } else if lower > node.median {
                current = &mut node.right;
            } else {
                let removed = node
                    .remove(lower, upper, payload)
                    .ok_or(IndexError::NotFound)?;
                self.len -= 1;
                return Ok(removed);
            }
        }
        Err(IndexError::NotFound)
    }
}

impl<F: Float, T> Default for IntervalTree<F, T> {
    fn default() -> Self {
        Self {
            root: Subtree::Empty,
            len: 0,
        }
    }
}

/// Clones into a freshly built tree, so the copy is balanced even when the
/// source was grown by [`insert`](IntervalTree::insert).
impl<F: Float, T: Clone> Clone for IntervalTree<F, T> {
    fn clone(&self) -> Self {
        let intervals: Vec<Interval<F, T>> = self.intervals().into_iter().cloned().collect();
        let endpoints = sorted_endpoints(&intervals);
        Self {
            root: build_recursive(intervals, &endpoints),
            len: self.len,
        }
    }
}

impl<F: Float + fmt::Debug, T: fmt::Debug> fmt::Debug for IntervalTree<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalTree")
            .field("len", &self.len)
            .field("nodes", &self.node_count())
            .field("intervals", &self.intervals())
            .finish()
    }
}

impl<F, T> Drop for IntervalTree<F, T> {
    /// Tears the tree down with an explicit stack; unbalanced trees can be
    /// deeper than the call stack allows.
    fn drop(&mut self) {
        let mut stack = vec![std::mem::replace(&mut self.root, Subtree::Empty)];
        while let Some(subtree) = stack.pop() {
            if let Subtree::Node(mut node) = subtree {
                stack.push(std::mem::replace(&mut node.left, Subtree::Empty));
                stack.push(std::mem::replace(&mut node.right, Subtree::Empty));
            }
        }
    }
}

/// Distinct endpoints of a batch, ascending.
fn sorted_endpoints<F: Float, T>(intervals: &[Interval<F, T>]) -> Vec<F> {
    let mut endpoints: Vec<F> = intervals
        .iter()
        .flat_map(|interval| [interval.lower, interval.upper])
        .collect();
    endpoints.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    endpoints.dedup();
    endpoints
}

/// Recursively builds the subtree for `intervals`, whose endpoints are `endpoints`.
fn build_recursive<F: Float, T>(intervals: Vec<Interval<F, T>>, endpoints: &[F]) -> Subtree<F, T> {
    if endpoints.is_empty() {
        return Subtree::Empty;
    }

    let median = endpoints[endpoints.len() / 2];

    let (centered, remaining): (Vec<_>, Vec<_>) = intervals
        .into_iter()
        .partition(|interval| interval.lower <= median && median <= interval.upper);

    // Remaining intervals never touch the median, so their endpoints split cleanly
    let remaining_endpoints = sorted_endpoints(&remaining);
    let split = remaining_endpoints.partition_point(|&e| e < median);
    let (left_endpoints, right_endpoints) = remaining_endpoints.split_at(split);

    let (below, above): (Vec<_>, Vec<_>) = remaining
        .into_iter()
        .partition(|interval| interval.upper < median);

    let left = build_recursive(below, left_endpoints);
    let right = build_recursive(above, right_endpoints);

    Subtree::Node(Box::new(Node::new(median, centered, left, right)))
}
