use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, VecDeque},
};

use crate::maze::Coord;

/// Discovered-but-unprocessed cells, ordered by one of three disciplines.
pub enum Frontier {
    /// First in, first out.
    Fifo(VecDeque<Coord>),
    /// Last in, first out.
    Lifo(Vec<Coord>),
    /// Smallest key first, earlier insertion first among equal keys.
    Priority(PriorityFrontier),
}

impl Frontier {
    pub fn fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }

    pub fn lifo() -> Self {
        Frontier::Lifo(Vec::new())
    }

    pub fn priority() -> Self {
        Frontier::Priority(PriorityFrontier::default())
    }

    /// Inserts `coord`. `key` is only meaningful for the priority discipline.
    pub fn push(&mut self, coord: Coord, key: usize) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(coord),
            Frontier::Lifo(stack) => stack.push(coord),
            Frontier::Priority(heap) => heap.push(coord, key),
        }
    }

    pub fn pop(&mut self) -> Option<Coord> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority(heap) => heap.pop(),
        }
    }

    /// Whether `coord` is waiting in the frontier.
    pub fn contains(&self, coord: Coord) -> bool {
        match self {
            Frontier::Fifo(queue) => queue.contains(&coord),
            Frontier::Lifo(stack) => stack.contains(&coord),
            Frontier::Priority(heap) => heap.contains(coord),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Priority(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Min-priority queue of cells with insertion-order tie-breaking and decrease-key.
///
/// Pushing a cell that is already pending replaces its key: the new entry is inserted
/// and the old one is skipped when it surfaces.
#[derive(Default)]
pub struct PriorityFrontier {
    /// Min-heap through `Reverse`, ordered by (key, insertion sequence).
    heap: BinaryHeap<Reverse<(usize, u64, Coord)>>,
    /// Live entry of every pending cell as (key, insertion sequence).
    pending: HashMap<Coord, (usize, u64)>,
    next_seq: u64,
}

impl PriorityFrontier {
    pub fn push(&mut self, coord: Coord, key: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(coord, (key, seq));
        self.heap.push(Reverse((key, seq, coord)));
    }

    pub fn pop(&mut self) -> Option<Coord> {
        while let Some(Reverse((key, seq, coord))) = self.heap.pop() {
            if self.pending.get(&coord) == Some(&(key, seq)) {
                self.pending.remove(&coord);
                return Some(coord);
            }
            // Superseded by a later push of the same cell
        }
        None
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.pending.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(frontier: &mut Frontier) -> Vec<Coord> {
        std::iter::from_fn(|| frontier.pop()).collect()
    }

    #[test]
    fn test_fifo_and_lifo_order() {
        let mut fifo = Frontier::fifo();
        let mut lifo = Frontier::lifo();
        for c in [(0, 0), (1, 0), (2, 0)] {
            fifo.push(c, 0);
            lifo.push(c, 0);
        }
        assert_eq!(drain(&mut fifo), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(drain(&mut lifo), vec![(2, 0), (1, 0), (0, 0)]);
    }

    #[test]
    fn test_priority_ties_break_by_insertion() {
        let mut frontier = Frontier::priority();
        // Coordinates chosen so that ordering by coordinate would disagree
        frontier.push((5, 5), 3);
        frontier.push((0, 0), 3);
        frontier.push((9, 1), 1);
        frontier.push((1, 9), 3);
        assert_eq!(frontier.len(), 4);
        assert_eq!(
            drain(&mut frontier),
            vec![(9, 1), (5, 5), (0, 0), (1, 9)]
        );
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_priority_decrease_key_skips_stale_entry() {
        let mut frontier = PriorityFrontier::default();
        frontier.push((1, 1), 10);
        frontier.push((2, 2), 5);
        frontier.push((1, 1), 2);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pending.get(&(1, 1)).map(|&(key, _)| key), Some(2));
        assert_eq!(frontier.pop(), Some((1, 1)));
        assert_eq!(frontier.pop(), Some((2, 2)));
        // The stale (1, 1) entry with key 10 must not come back
        assert_eq!(frontier.pop(), None);
        assert!(!frontier.contains((1, 1)));
    }

    #[test]
    fn test_contains() {
        let mut frontier = Frontier::fifo();
        frontier.push((3, 4), 0);
        assert!(frontier.contains((3, 4)));
        assert!(!frontier.contains((4, 3)));
        frontier.pop();
        assert!(!frontier.contains((3, 4)));
    }
}
