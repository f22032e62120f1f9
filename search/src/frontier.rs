//! Best-first frontier with insertion-order tie-breaking and visited tracking.
//!
//! Uses a `BTreeSet`-based visited set (not `HashSet`) so iteration order is
//! deterministic wherever it leaks into output.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use trailhead_kernel::graph::NodeId;

use crate::state::{FrontierKey, SearchState};

/// A frontier entry wrapping a state with its ordering key.
///
/// `BinaryHeap` is a max-heap, so we use `Reverse<FrontierKey>` to get
/// min-heap behavior (lowest accumulator first).
#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    state: SearchState,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Best-first frontier manager.
///
/// Maintains:
/// - A `BinaryHeap` for O(log n) pop of the best state
/// - A monotonic sequence counter stamped onto every pushed state
/// - A `BTreeSet<NodeId>` of finalized nodes
///
/// Pushing never consults the visited set: the same node may sit on the
/// frontier several times, reached along different paths. The caller
/// decides at pop time whether a state is stale via [`Self::mark_visited`].
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<FrontierEntry>,
    visited: BTreeSet<NodeId>,
    next_sequence: u64,
    high_water: u64,
}

impl BestFirstFrontier {
    /// Create a new empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a state, stamping it with the next insertion sequence number.
    ///
    /// Returns the assigned sequence number.
    pub fn push(&mut self, mut state: SearchState) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        state.sequence = sequence;
        self.heap.push(FrontierEntry {
            key: Reverse(FrontierKey::from(&state)),
            state,
        });
        let size = self.heap.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
        sequence
    }

    /// Pop the best (lowest key) state from the frontier.
    #[must_use]
    pub fn pop(&mut self) -> Option<SearchState> {
        self.heap.pop().map(|e| e.state)
    }

    /// Mark `node` as finalized.
    ///
    /// Returns `false` if it was already visited.
    pub fn mark_visited(&mut self, node: NodeId) -> bool {
        self.visited.insert(node)
    }

    /// Check if a node has been finalized.
    #[must_use]
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    /// Number of finalized nodes.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Current frontier size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the frontier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// High-water mark of frontier size.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Total number of states ever pushed.
    #[must_use]
    pub fn pushed(&self) -> u64 {
        self.next_sequence
    }
}
