mod bidirectional;
mod frontier;
pub mod path;
mod search;

pub use bidirectional::BidirectionalSearch;
pub use frontier::{Frontier, PriorityFrontier};
pub use search::{FrontierSearch, Policy};

use crate::maze::{Coord, Maze};

/// Result of a finished search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Start-to-goal cells, both ends included. `None` when the goal is unreachable.
    pub path: Option<Vec<Coord>>,
    /// Distinct cells popped from the frontier.
    pub visited_count: usize,
}

/// What one call to `advance` left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    Running,
    Done(SearchOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Bfs,
    Dfs,
    BidirectionalBfs,
    AStar,
    Gbfs,
}

impl Solver {
    pub const ALL: [Solver; 5] = [
        Solver::Bfs,
        Solver::Dfs,
        Solver::BidirectionalBfs,
        Solver::AStar,
        Solver::Gbfs,
    ];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::BidirectionalBfs => write!(f, "Bidirectional BFS"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::Gbfs => write!(f, "Greedy Best-First Search (GBFS)"),
        }
    }
}

/// Grid distance `|dx| + |dy|` between two cells.
pub fn manhattan_distance(a: Coord, b: Coord) -> usize {
    (a.0.abs_diff(b.0) as usize) + (a.1.abs_diff(b.1) as usize)
}

/// A search in progress, advanced one frontier pop at a time.
///
/// The maze's `visited` and `is_solution` flags must be cleared with
/// [`Maze::reset_search`] before the first call to `advance`.
pub enum SearchRun {
    Single(FrontierSearch),
    Bidirectional(BidirectionalSearch),
}

impl SearchRun {
    pub fn new(solver: Solver, start: Coord, goal: Coord) -> Self {
        match Policy::for_solver(solver) {
            Some(policy) => SearchRun::Single(FrontierSearch::new(policy, start, goal)),
            None => SearchRun::Bidirectional(BidirectionalSearch::new(start, goal)),
        }
    }

    pub fn advance(&mut self, maze: &mut Maze) -> SearchStep {
        match self {
            SearchRun::Single(search) => search.advance(maze),
            SearchRun::Bidirectional(search) => search.advance(maze),
        }
    }

    /// Cells popped so far.
    pub fn visited_count(&self) -> usize {
        match self {
            SearchRun::Single(search) => search.visited_count(),
            SearchRun::Bidirectional(search) => search.visited_count(),
        }
    }

    /// The final result, or `None` while the run has not finished.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            SearchRun::Single(search) => search.outcome(),
            SearchRun::Bidirectional(search) => search.outcome(),
        }
    }
}

/// Runs `solver` from `start` to `goal` until it finishes.
pub fn solve(maze: &mut Maze, solver: Solver, start: Coord, goal: Coord) -> SearchOutcome {
    tracing::info!("[solve] {} from {:?} to {:?}", solver, start, goal);
    let mut run = SearchRun::new(solver, start, goal);
    let outcome = loop {
        if let SearchStep::Done(outcome) = run.advance(maze) {
            break outcome;
        }
    };
    match &outcome.path {
        Some(path) => tracing::info!(
            "[solve] {} found a {}-cell path, {} cells explored",
            solver,
            path.len(),
            outcome.visited_count
        ),
        None => tracing::info!(
            "[solve] {} found no path, {} cells explored",
            solver,
            outcome.visited_count
        ),
    }
    outcome
}

pub fn solve_bfs(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    solve(maze, Solver::Bfs, start, goal)
}

pub fn solve_dfs(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    solve(maze, Solver::Dfs, start, goal)
}

pub fn solve_bidirectional_bfs(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    solve(maze, Solver::BidirectionalBfs, start, goal)
}

pub fn solve_astar(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    solve(maze, Solver::AStar, start, goal)
}

pub fn solve_gbfs(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    solve(maze, Solver::Gbfs, start, goal)
}

/// Clears the previous run and solves from the top-left to the bottom-right corner.
pub fn solve_maze(maze: &mut Maze, solver: Solver) -> SearchOutcome {
    maze.reset_search();
    let (start, goal) = (maze.start(), maze.goal());
    solve(maze, solver, start, goal)
}
