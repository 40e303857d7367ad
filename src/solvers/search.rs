use std::collections::{HashMap, HashSet};

use super::frontier::Frontier;
use super::path::{ParentMap, reconstruct_path};
use super::{SearchOutcome, SearchStep, Solver, manhattan_distance};
use crate::maze::{Coord, Maze};

/// How a single-frontier search orders and admits newly discovered cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// FIFO, a cell is admitted once.
    Breadth,
    /// LIFO, a cell is admitted once.
    Depth,
    /// Min f = g + h, parents and keys improve whenever a strictly shorter g turns up.
    AStar,
    /// Min h, the first discovery fixes the parent.
    Greedy,
}

impl Policy {
    pub fn for_solver(solver: Solver) -> Option<Policy> {
        match solver {
            Solver::Bfs => Some(Policy::Breadth),
            Solver::Dfs => Some(Policy::Depth),
            Solver::AStar => Some(Policy::AStar),
            Solver::Gbfs => Some(Policy::Greedy),
            Solver::BidirectionalBfs => None,
        }
    }

    fn frontier(self) -> Frontier {
        match self {
            Policy::Breadth => Frontier::fifo(),
            Policy::Depth => Frontier::lifo(),
            Policy::AStar | Policy::Greedy => Frontier::priority(),
        }
    }
}

/// Resumable search over a single frontier, shared by BFS, DFS, A* and greedy best-first.
pub struct FrontierSearch {
    policy: Policy,
    start: Coord,
    goal: Coord,
    frontier: Frontier,
    parents: ParentMap,
    /// Cells ever admitted into the frontier (BFS / DFS duplicate suppression).
    discovered: HashSet<Coord>,
    /// Cells already popped and expanded.
    closed: HashSet<Coord>,
    /// Best known distance from the start (A* only).
    g_costs: HashMap<Coord, usize>,
    visited_count: usize,
    outcome: Option<SearchOutcome>,
}

impl FrontierSearch {
    pub fn new(policy: Policy, start: Coord, goal: Coord) -> Self {
        let mut search = FrontierSearch {
            policy,
            start,
            goal,
            frontier: policy.frontier(),
            parents: ParentMap::new(),
            discovered: HashSet::new(),
            closed: HashSet::new(),
            g_costs: HashMap::new(),
            visited_count: 0,
            outcome: None,
        };
        search.parents.insert(start, None);
        search.discovered.insert(start);
        search.g_costs.insert(start, 0);
        search.frontier.push(start, 0);
        search
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    /// Next cell to process, skipping anything already expanded.
    fn pop_next(&mut self) -> Option<Coord> {
        while let Some(coord) = self.frontier.pop() {
            if !self.closed.contains(&coord) {
                return Some(coord);
            }
        }
        None
    }

    fn finish(&mut self, path: Option<Vec<Coord>>) -> SearchStep {
        let outcome = SearchOutcome {
            path,
            visited_count: self.visited_count,
        };
        self.outcome = Some(outcome.clone());
        SearchStep::Done(outcome)
    }

    /// Pops one cell, marks it visited and either finishes or expands its open neighbors.
    pub fn advance(&mut self, maze: &mut Maze) -> SearchStep {
        if let Some(outcome) = &self.outcome {
            return SearchStep::Done(outcome.clone());
        }
        if !maze.is_in_bounds(self.start) {
            return self.finish(None);
        }
        let Some(current) = self.pop_next() else {
            tracing::debug!(
                "[solve] {:?} frontier exhausted after {} cells",
                self.policy,
                self.visited_count
            );
            return self.finish(None);
        };

        maze.set_visited(current);
        self.visited_count += 1;
        self.closed.insert(current);
        tracing::trace!("[solve] {:?} visiting {:?}", self.policy, current);

        if current == self.goal {
            let path = match reconstruct_path(maze, &self.parents, self.start, self.goal) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::debug!("[solve] goal reached but path is broken: {}", e);
                    None
                }
            };
            return self.finish(path);
        }

        self.expand(maze, current);
        SearchStep::Running
    }

    fn expand(&mut self, maze: &Maze, current: Coord) {
        let neighbors = maze.open_search_neighbors(current);
        match self.policy {
            Policy::Breadth | Policy::Depth => {
                for neighbor in neighbors {
                    if self.discovered.insert(neighbor) {
                        self.parents.insert(neighbor, Some(current));
                        self.frontier.push(neighbor, 0);
                    }
                }
            }
            Policy::AStar => {
                let tentative = self.g_costs.get(&current).copied().unwrap_or_default() + 1;
                for neighbor in neighbors {
                    if self.closed.contains(&neighbor) {
                        continue;
                    }
                    let improves = self
                        .g_costs
                        .get(&neighbor)
                        .is_none_or(|&known| tentative < known);
                    if improves {
                        self.parents.insert(neighbor, Some(current));
                        self.g_costs.insert(neighbor, tentative);
                        let f = tentative + manhattan_distance(neighbor, self.goal);
                        // Re-pushing a pending cell replaces its key
                        self.frontier.push(neighbor, f);
                    }
                }
            }
            Policy::Greedy => {
                for neighbor in neighbors {
                    if self.closed.contains(&neighbor) || self.frontier.contains(neighbor) {
                        continue;
                    }
                    self.parents.insert(neighbor, Some(current));
                    self.frontier
                        .push(neighbor, manhattan_distance(neighbor, self.goal));
                }
            }
        }
    }
}
