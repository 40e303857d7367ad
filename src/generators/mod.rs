use rand::{SeedableRng, rngs::StdRng};

mod backtrack;

pub use backtrack::GenerationRun;

use crate::maze::Maze;

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Resets `maze` and carves a perfect maze starting from its top-left corner.
/// Returns the number of generation steps taken.
pub fn generate_maze(maze: &mut Maze, seed: Option<u64>) -> usize {
    maze.reset_generation();
    let mut run = GenerationRun::new(maze.start(), seed);
    tracing::info!(
        "[generate] carving {}x{} maze (seed: {:?})",
        maze.width(),
        maze.height(),
        seed
    );
    while !run.advance(maze) {}
    tracing::info!(
        "[generate] done in {} steps, {} passages",
        run.steps(),
        maze.passage_count()
    );
    run.steps()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Coord;
    use crate::maze::tests::assert_wall_symmetry;

    /// Counts cells reachable from the start through open passages.
    fn reachable_from_start(maze: &Maze) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut stack: Vec<Coord> = vec![maze.start()];
        seen.insert(maze.start());
        while let Some(c) = stack.pop() {
            for (d, n) in maze.neighbors(c) {
                if maze.has_passage(c, d) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_generates_perfect_maze() {
        for (width, height, seed) in [(1, 1, 0), (2, 2, 1), (5, 3, 2), (24, 18, 3), (1, 9, 4)] {
            let mut maze = Maze::new(width, height);
            let steps = generate_maze(&mut maze, Some(seed));
            let cells = maze.len();
            // A spanning tree over n cells has exactly n - 1 edges
            assert_eq!(maze.passage_count(), cells - 1);
            assert_eq!(reachable_from_start(&maze), cells);
            assert!(steps <= 2 * cells);
            assert_wall_symmetry(&maze);
        }
    }

    #[test]
    fn test_regenerate_resets_previous_maze() {
        let mut maze = Maze::new(6, 6);
        generate_maze(&mut maze, Some(10));
        maze.set_visited((0, 0));
        generate_maze(&mut maze, Some(11));
        assert_eq!(maze.passage_count(), maze.len() - 1);
        assert_eq!(maze.visited_count(), 0);
    }

    #[test]
    fn test_empty_maze() {
        let mut maze = Maze::new(0, 0);
        assert_eq!(generate_maze(&mut maze, Some(0)), 0);
        assert!(maze.is_empty());
    }
}
