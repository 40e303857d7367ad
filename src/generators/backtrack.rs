use rand::{Rng, rngs::StdRng};

use crate::generators::get_rng;
use crate::maze::{Coord, Maze};

/// Resumable randomized depth-first carving.
///
/// Each call to [`GenerationRun::advance`] performs one unit of work: carve into a
/// random uncarved neighbor of the current cell, or backtrack one cell along the stack.
/// The driver decides how often to call it and may drop the run at any point.
pub struct GenerationRun {
    current: Coord,
    /// Cells to come back to, pushed and popped at the tail.
    stack: Vec<Coord>,
    rng: StdRng,
    steps: usize,
    done: bool,
}

impl GenerationRun {
    /// Starts carving at `start`. The maze must be freshly reset.
    pub fn new(start: Coord, seed: Option<u64>) -> Self {
        GenerationRun {
            current: start,
            stack: Vec::new(),
            rng: get_rng(seed),
            steps: 0,
            done: false,
        }
    }

    /// The cell the carver is standing on.
    pub fn current(&self) -> Coord {
        self.current
    }

    /// Cells waiting to be backtracked to, bottom first.
    pub fn stack(&self) -> &[Coord] {
        &self.stack
    }

    /// Number of calls to `advance` that did work.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Performs one generation step. Returns `true` once the maze is complete.
    pub fn advance(&mut self, maze: &mut Maze) -> bool {
        if self.done {
            return true;
        }
        if !maze.is_in_bounds(self.current) {
            tracing::debug!(
                "[generate] start {:?} is outside the maze, nothing to carve",
                self.current
            );
            self.done = true;
            return true;
        }
        self.steps += 1;

        maze.set_generated(self.current);
        let neighbors = maze.unvisited_topology_neighbors(self.current);

        if !neighbors.is_empty() {
            let next = neighbors[self.rng.random_range(0..neighbors.len())];
            maze.set_generated(next);
            // Come back here later to look at the remaining neighbors
            self.stack.push(self.current);
            maze.remove_wall_pair(self.current, next);
            tracing::trace!("[generate] carved {:?} -> {:?}", self.current, next);
            self.current = next;
        } else if let Some(previous) = self.stack.pop() {
            tracing::trace!("[generate] backtrack {:?} -> {:?}", self.current, previous);
            self.current = previous;
        } else {
            self.done = true;
            tracing::debug!("[generate] finished after {} steps", self.steps);
        }
        self.done
    }
}
