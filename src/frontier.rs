//! Worklists for the search driver.
//!
//! BFS uses [`FifoFrontier`], which hands nodes back in discovery order.
//! A* uses [`PriorityFrontier`], a binary min-heap on `(g + h, creation_order)`.
//! The heap cannot decrease a key in place: a better `g` is pushed as a new
//! entry and the driver drops stale entries when they surface.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::codec::{CanonicalKey, OrderedKey};
use crate::engine::State;

/// An ordered worklist of search nodes.
pub trait Frontier {
    type Node;

    fn push(&mut self, node: Self::Node);

    /// Removes the next node to expand.
    fn pop(&mut self) -> Option<Self::Node>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest size the frontier has reached.
    fn high_water(&self) -> usize;
}

/// A breadth-first search node.
#[derive(Debug, Clone)]
pub struct BfsNode {
    pub state: State,
    pub key: OrderedKey,
    /// Moves from the start state.
    pub moves: usize,
}

/// An A* search node. Every move costs one, so `g` is also the number of
/// moves from the start.
#[derive(Debug, Clone)]
pub struct AStarNode {
    pub state: State,
    pub key: OrderedKey,
    pub canonical: CanonicalKey,
    pub g: u32,
    pub h: u32,
}

impl AStarNode {
    /// `f = g + h`, the frontier ordering key.
    pub fn f_cost(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

/// First-in first-out frontier.
#[derive(Debug)]
pub struct FifoFrontier<N> {
    queue: VecDeque<N>,
    high_water: usize,
}

impl<N> FifoFrontier<N> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            high_water: 0,
        }
    }
}

impl<N> Default for FifoFrontier<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Frontier for FifoFrontier<N> {
    type Node = N;

    fn push(&mut self, node: N) {
        self.queue.push_back(node);
        self.high_water = self.high_water.max(self.queue.len());
    }

    fn pop(&mut self) -> Option<N> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Ordering key: lower `f_cost` first, then older `creation_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorityKey {
    f_cost: u32,
    creation_order: u64,
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse`.
#[derive(Debug)]
struct PriorityEntry {
    key: Reverse<PriorityKey>,
    node: AStarNode,
}

impl PartialEq for PriorityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PriorityEntry {}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap frontier for A*. Ties on `f` pop in insertion order.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<PriorityEntry>,
    next_order: u64,
    high_water: usize,
}

impl PriorityFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the node that `pop` would return next.
    #[cfg(test)]
    fn peek_key(&self) -> Option<PriorityKey> {
        self.heap.peek().map(|e| e.key.0)
    }
}

impl Frontier for PriorityFrontier {
    type Node = AStarNode;

    fn push(&mut self, node: AStarNode) {
        let key = PriorityKey {
            f_cost: node.f_cost(),
            creation_order: self.next_order,
        };
        self.next_order += 1;
        self.heap.push(PriorityEntry {
            key: Reverse(key),
            node,
        });
        self.high_water = self.high_water.max(self.heap.len());
    }

    fn pop(&mut self) -> Option<AStarNode> {
        self.heap.pop().map(|e| e.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn high_water(&self) -> usize {
        self.high_water
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode_canonical, encode_ordered};

    fn make_node(key: &str, g: u32, h: u32) -> AStarNode {
        let state = decode(key).unwrap();
        AStarNode {
            key: encode_ordered(&state),
            canonical: encode_canonical(&state),
            state,
            g,
            h,
        }
    }

    #[test]
    fn test_pop_returns_lowest_f_cost_first() {
        let mut frontier = PriorityFrontier::new();
        frontier.push(make_node("10|00", 3, 4));
        frontier.push(make_node("20|00", 1, 1));
        frontier.push(make_node("30|00", 0, 9));

        assert_eq!(frontier.peek_key().map(|k| k.f_cost), Some(2));
        let order: Vec<u32> = std::iter::from_fn(|| frontier.pop())
            .map(|n| n.f_cost())
            .collect();
        assert_eq!(order, vec![2, 7, 9]);
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut frontier = PriorityFrontier::new();
        frontier.push(make_node("10|00", 2, 0));
        frontier.push(make_node("20|00", 0, 2));
        frontier.push(make_node("30|00", 1, 1));

        let keys: Vec<String> = std::iter::from_fn(|| frontier.pop())
            .map(|n| n.key.as_str().to_string())
            .collect();
        assert_eq!(keys, vec!["10|00", "20|00", "30|00"]);
    }

    #[test]
    fn test_reinserted_key_keeps_both_entries() {
        let mut frontier = PriorityFrontier::new();
        frontier.push(make_node("10|00", 5, 0));
        frontier.push(make_node("10|00", 2, 0));
        assert_eq!(frontier.len(), 2, "stale entries are filtered by the driver, not here");
        assert_eq!(frontier.pop().map(|n| n.g), Some(2));
        assert_eq!(frontier.pop().map(|n| n.g), Some(5));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_fifo_preserves_discovery_order() {
        let mut frontier = FifoFrontier::new();
        for i in 0..4 {
            frontier.push(i);
        }
        assert_eq!(frontier.pop(), Some(0));
        frontier.push(9);
        let rest: Vec<i32> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(rest, vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_high_water_tracks_max_size() {
        let mut frontier = PriorityFrontier::new();
        frontier.push(make_node("10|00", 1, 0));
        frontier.push(make_node("20|00", 2, 0));
        frontier.push(make_node("30|00", 3, 0));
        assert_eq!(frontier.high_water(), 3);

        let _ = frontier.pop();
        assert_eq!(frontier.high_water(), 3, "high water should not decrease on pop");

        let mut fifo = FifoFrontier::new();
        fifo.push(1);
        fifo.push(2);
        let _ = fifo.pop();
        assert_eq!(fifo.high_water(), 2);
        assert_eq!(fifo.len(), 1);
    }

    #[test]
    fn test_priority_key_orders_by_f_then_creation() {
        let a = PriorityKey {
            f_cost: 1,
            creation_order: 10,
        };
        let b = PriorityKey {
            f_cost: 2,
            creation_order: 1,
        };
        let c = PriorityKey {
            f_cost: 1,
            creation_order: 3,
        };
        assert!(a < b, "lower f_cost should sort first");
        assert!(c < a, "older creation_order should sort first on f_cost tie");
    }
}
