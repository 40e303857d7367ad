use std::collections::HashMap;

use crate::error::MazeError;
use crate::maze::{Coord, Maze};

/// Predecessor of every reached cell. The root maps to `None`.
pub type ParentMap = HashMap<Coord, Option<Coord>>;

/// Follows `parents` from `from` back to the root, returning the chain `from`-first.
fn chain_to_root(parents: &ParentMap, from: Coord) -> Result<Vec<Coord>, MazeError> {
    let mut chain = Vec::new();
    let mut current = Some(from);
    while let Some(coord) = current {
        // A well-formed tree never needs more links than it has entries
        if chain.len() > parents.len() {
            return Err(MazeError::MissingParent { coord });
        }
        chain.push(coord);
        current = *parents
            .get(&coord)
            .ok_or(MazeError::MissingParent { coord })?;
    }
    Ok(chain)
}

/// Rebuilds the start-to-goal path from a single search tree and marks it as the solution.
///
/// Nothing is marked when `goal` was never reached or the chain does not lead back to `start`.
pub fn reconstruct_path(
    maze: &mut Maze,
    parents: &ParentMap,
    start: Coord,
    goal: Coord,
) -> Result<Vec<Coord>, MazeError> {
    let mut path = chain_to_root(parents, goal)?;
    path.reverse();
    if path.first() != Some(&start) {
        return Err(MazeError::MissingParent { coord: start });
    }
    path.iter().for_each(|&c| maze.set_solution(c));
    Ok(path)
}

/// Joins the two trees of a bidirectional search at `meeting` and marks the result.
///
/// The start side contributes start..=meeting, the end side the cells after `meeting`
/// down to its own root, so `meeting` appears exactly once.
pub fn reconstruct_bidirectional_path(
    maze: &mut Maze,
    start_parents: &ParentMap,
    end_parents: &ParentMap,
    meeting: Coord,
) -> Result<Vec<Coord>, MazeError> {
    let mut path = chain_to_root(start_parents, meeting)?;
    path.reverse();

    let after_meeting = *end_parents
        .get(&meeting)
        .ok_or(MazeError::MissingParent { coord: meeting })?;
    if let Some(next) = after_meeting {
        path.extend(chain_to_root(end_parents, next)?);
    }

    path.iter().for_each(|&c| maze.set_solution(c));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents(links: &[(Coord, Option<Coord>)]) -> ParentMap {
        links.iter().copied().collect()
    }

    #[test]
    fn test_reconstruct_path() {
        let mut maze = Maze::new(3, 3);
        let map = parents(&[
            ((0, 0), None),
            ((1, 0), Some((0, 0))),
            ((1, 1), Some((1, 0))),
            ((0, 1), Some((0, 0))),
        ]);
        let path = reconstruct_path(&mut maze, &map, (0, 0), (1, 1)).unwrap();
        assert_eq!(path, vec![(0, 0), (1, 0), (1, 1)]);
        assert!(path.iter().all(|&c| maze[c].is_solution()));
        assert!(!maze[(0, 1)].is_solution());
    }

    #[test]
    fn test_reconstruct_missing_goal() {
        let mut maze = Maze::new(3, 3);
        let map = parents(&[((0, 0), None)]);
        assert_eq!(
            reconstruct_path(&mut maze, &map, (0, 0), (2, 2)),
            Err(MazeError::MissingParent { coord: (2, 2) })
        );
        assert!(maze.coords().all(|c| !maze[c].is_solution()));
    }

    #[test]
    fn test_reconstruct_wrong_root() {
        let mut maze = Maze::new(3, 3);
        let map = parents(&[((2, 2), None), ((2, 1), Some((2, 2)))]);
        assert_eq!(
            reconstruct_path(&mut maze, &map, (0, 0), (2, 1)),
            Err(MazeError::MissingParent { coord: (0, 0) })
        );
    }

    #[test]
    fn test_reconstruct_cycle_is_rejected() {
        let mut maze = Maze::new(3, 3);
        let map = parents(&[((0, 0), Some((1, 0))), ((1, 0), Some((0, 0)))]);
        assert!(reconstruct_path(&mut maze, &map, (0, 0), (1, 0)).is_err());
    }

    #[test]
    fn test_bidirectional_merge() {
        let mut maze = Maze::new(4, 1);
        let start_parents = parents(&[
            ((0, 0), None),
            ((1, 0), Some((0, 0))),
            ((2, 0), Some((1, 0))),
        ]);
        let end_parents = parents(&[
            ((3, 0), None),
            ((2, 0), Some((3, 0))),
        ]);
        let path =
            reconstruct_bidirectional_path(&mut maze, &start_parents, &end_parents, (2, 0))
                .unwrap();
        assert_eq!(path, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(path.iter().filter(|&&c| c == (2, 0)).count(), 1);
        assert!(maze.coords().all(|c| maze[c].is_solution()));
    }

    #[test]
    fn test_bidirectional_meeting_at_goal() {
        let mut maze = Maze::new(2, 1);
        let start_parents = parents(&[((0, 0), None), ((1, 0), Some((0, 0)))]);
        let end_parents = parents(&[((1, 0), None)]);
        let path =
            reconstruct_bidirectional_path(&mut maze, &start_parents, &end_parents, (1, 0))
                .unwrap();
        assert_eq!(path, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_bidirectional_meeting_unknown_to_end_side() {
        let mut maze = Maze::new(2, 1);
        let start_parents = parents(&[((0, 0), None), ((1, 0), Some((0, 0)))]);
        let end_parents = ParentMap::new();
        assert_eq!(
            reconstruct_bidirectional_path(&mut maze, &start_parents, &end_parents, (1, 0)),
            Err(MazeError::MissingParent { coord: (1, 0) })
        );
    }
}
