use std::collections::{HashSet, VecDeque};

use super::path::{ParentMap, reconstruct_bidirectional_path};
use super::{SearchOutcome, SearchStep};
use crate::maze::{Coord, Maze};

/// One direction of the search: a FIFO queue growing a tree from its root.
struct Side {
    queue: VecDeque<Coord>,
    discovered: HashSet<Coord>,
    parents: ParentMap,
}

impl Side {
    fn new(root: Coord) -> Self {
        let mut side = Side {
            queue: VecDeque::from([root]),
            discovered: HashSet::new(),
            parents: ParentMap::new(),
        };
        side.discovered.insert(root);
        side.parents.insert(root, None);
        side
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Start,
    End,
}

/// Resumable breadth-first search growing from both corners at once.
///
/// Every round pops one cell on the start side and then one on the end side, one pop per
/// call to [`BidirectionalSearch::advance`]. The run stops as soon as a side touches a
/// cell the other side has already discovered.
pub struct BidirectionalSearch {
    from_start: Side,
    from_end: Side,
    turn: Turn,
    visited_count: usize,
    meeting: Option<Coord>,
    outcome: Option<SearchOutcome>,
}

impl BidirectionalSearch {
    pub fn new(start: Coord, goal: Coord) -> Self {
        BidirectionalSearch {
            from_start: Side::new(start),
            from_end: Side::new(goal),
            turn: Turn::Start,
            visited_count: 0,
            meeting: None,
            outcome: None,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    /// Cell where the two trees joined, once they have.
    pub fn meeting(&self) -> Option<Coord> {
        self.meeting
    }

    fn finish(&mut self, path: Option<Vec<Coord>>) -> SearchStep {
        let outcome = SearchOutcome {
            path,
            visited_count: self.visited_count,
        };
        self.outcome = Some(outcome.clone());
        SearchStep::Done(outcome)
    }

    fn meet(&mut self, maze: &mut Maze, meeting: Coord) -> SearchStep {
        tracing::debug!(
            "[solve] bidirectional frontiers met at {:?} after {} cells",
            meeting,
            self.visited_count
        );
        self.meeting = Some(meeting);
        let path = match reconstruct_bidirectional_path(
            maze,
            &self.from_start.parents,
            &self.from_end.parents,
            meeting,
        ) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("[solve] frontiers met but path is broken: {}", e);
                None
            }
        };
        self.finish(path)
    }

    /// Pops and expands one cell from the side whose turn it is.
    pub fn advance(&mut self, maze: &mut Maze) -> SearchStep {
        if let Some(outcome) = &self.outcome {
            return SearchStep::Done(outcome.clone());
        }
        // A round only begins while both sides still have work
        if self.turn == Turn::Start
            && (self.from_start.queue.is_empty() || self.from_end.queue.is_empty())
        {
            return self.finish(None);
        }

        let turn = self.turn;
        self.turn = match turn {
            Turn::Start => Turn::End,
            Turn::End => Turn::Start,
        };
        let (side, other) = match turn {
            Turn::Start => (&mut self.from_start, &self.from_end),
            Turn::End => (&mut self.from_end, &self.from_start),
        };

        let Some(current) = side.queue.pop_front() else {
            return self.finish(None);
        };
        if !maze.is_in_bounds(current) {
            return self.finish(None);
        }
        maze.set_visited(current);
        self.visited_count += 1;
        tracing::trace!("[solve] bidirectional {:?} side visiting {:?}", turn, current);

        // Only possible when both corners are the same cell
        if other.discovered.contains(&current) {
            return self.meet(maze, current);
        }

        let mut meeting = None;
        for neighbor in maze.open_search_neighbors(current) {
            if side.discovered.insert(neighbor) {
                side.queue.push_back(neighbor);
                side.parents.insert(neighbor, Some(current));
            }
            if other.discovered.contains(&neighbor) {
                meeting = Some(neighbor);
                break;
            }
        }
        match meeting {
            Some(meeting) => self.meet(maze, meeting),
            None => SearchStep::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A single row with every wall between neighbors removed.
    fn corridor(len: u8) -> Maze {
        let mut maze = Maze::new(len, 1);
        for x in 0..len {
            maze.set_generated((x, 0));
            if x + 1 < len {
                maze.remove_wall_pair((x, 0), (x + 1, 0));
            }
        }
        maze
    }

    fn drain(search: &mut BidirectionalSearch, maze: &mut Maze) -> SearchOutcome {
        loop {
            if let SearchStep::Done(outcome) = search.advance(maze) {
                return outcome;
            }
        }
    }

    #[test]
    fn test_meets_in_the_middle() {
        let mut maze = corridor(6);
        let mut search = BidirectionalSearch::new((0, 0), (5, 0));
        let outcome = drain(&mut search, &mut maze);
        assert_eq!(
            outcome.path.unwrap(),
            (0..6).map(|x| (x, 0)).collect::<Vec<_>>()
        );
        // start pops 0, end pops 5, start pops 1, end pops 4, start pops 2 and sees 3
        assert_eq!(outcome.visited_count, 5);
        assert_eq!(search.meeting(), Some((3, 0)));
        assert!(maze.coords().all(|c| maze[c].is_solution()));
    }

    #[test]
    fn test_adjacent_corners() {
        let mut maze = corridor(2);
        let mut search = BidirectionalSearch::new((0, 0), (1, 0));
        let outcome = drain(&mut search, &mut maze);
        assert_eq!(outcome.path.unwrap(), vec![(0, 0), (1, 0)]);
        assert_eq!(outcome.visited_count, 1);
    }

    #[test]
    fn test_same_start_and_goal() {
        let mut maze = corridor(3);
        let mut search = BidirectionalSearch::new((1, 0), (1, 0));
        let outcome = drain(&mut search, &mut maze);
        assert_eq!(outcome.path.unwrap(), vec![(1, 0)]);
        assert_eq!(outcome.visited_count, 1);
    }

    #[test]
    fn test_disconnected_sides_exhaust() {
        let mut maze = Maze::new(3, 1);
        maze.remove_wall_pair((0, 0), (1, 0));
        let mut search = BidirectionalSearch::new((0, 0), (2, 0));
        let outcome = drain(&mut search, &mut maze);
        assert_eq!(outcome.path, None);
        assert!(outcome.visited_count > 0);
        assert_eq!(search.meeting(), None);
    }
}
