use std::sync::mpsc::{Sender, SyncSender};

use super::Coord;
use super::cell::Cell;

/// A change observed on the grid, emitted to the sink after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// Sent once when the grid is created.
    Initial { cell: Cell, width: u8, height: u8 },
    /// Sent after a cell's walls or flags changed.
    Update { coord: Coord, old: Cell, new: Cell },
}

/// Receiver of grid events. Delivery is fire-and-forget: a sink that cannot accept
/// an event drops it, the grid never waits on or reacts to the outcome.
pub trait GridSink {
    fn send_event(&mut self, event: GridEvent);
}

impl<E: From<GridEvent>> GridSink for Sender<E> {
    fn send_event(&mut self, event: GridEvent) {
        let _ = self.send(event.into());
    }
}

impl<E: From<GridEvent>> GridSink for SyncSender<E> {
    fn send_event(&mut self, event: GridEvent) {
        let _ = self.send(event.into());
    }
}

/// Row-major storage of cells with an optional event sink.
pub struct Grid {
    pub data: Box<[Cell]>,
    width: u8,
    height: u8,
    sink: Option<Box<dyn GridSink + Send>>,
}

impl Grid {
    pub fn new(width: u8, height: u8, cell: Cell, sink: Option<Box<dyn GridSink + Send>>) -> Self {
        let data = vec![cell; width as usize * height as usize].into_boxed_slice();
        let mut grid = Grid {
            data,
            width,
            height,
            sink,
        };
        grid.emit(GridEvent::Initial {
            cell,
            width,
            height,
        });
        grid
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    fn ravel_index(&self, x: u8, y: u8) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn emit(&mut self, event: GridEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.send_event(event);
        }
    }

    /// Applies `f` to the cell at `coord` and reports the change if anything differs.
    pub fn update<F>(&mut self, coord: (u8, u8), f: F)
    where
        F: FnOnce(&mut Cell),
    {
        let idx = self.ravel_index(coord.0, coord.1);
        let old = self.data[idx];
        let mut new = old;
        f(&mut new);
        if old != new {
            self.data[idx] = new;
            self.emit(GridEvent::Update { coord, old, new });
        }
    }
}

impl std::ops::Index<(u8, u8)> for Grid {
    type Output = Cell;

    fn index(&self, index: (u8, u8)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_event_is_sent() {
        let (tx, rx) = std::sync::mpsc::channel::<GridEvent>();
        let _grid = Grid::new(3, 2, Cell::WALLED, Some(Box::new(tx)));
        let events = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![GridEvent::Initial {
                cell: Cell::WALLED,
                width: 3,
                height: 2
            }]
        );
    }

    #[test]
    fn test_update_only_reports_changes() {
        let (tx, rx) = std::sync::mpsc::channel::<GridEvent>();
        let mut grid = Grid::new(2, 2, Cell::WALLED, Some(Box::new(tx)));
        rx.try_iter().for_each(drop);

        grid.update((1, 0), |cell| cell.set_visited(true));
        // Same value again, nothing to report
        grid.update((1, 0), |cell| cell.set_visited(true));

        let events = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(events.len(), 1);
        match events[0] {
            GridEvent::Update { coord, old, new } => {
                assert_eq!(coord, (1, 0));
                assert!(!old.is_visited());
                assert!(new.is_visited());
            }
            _ => panic!("expected an update event"),
        }
        assert!(grid[(1, 0)].is_visited());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (tx, rx) = std::sync::mpsc::channel::<GridEvent>();
        drop(rx);
        let mut grid = Grid::new(2, 2, Cell::WALLED, Some(Box::new(tx)));
        grid.update((0, 0), |cell| cell.set_generated(true));
        assert!(grid[(0, 0)].is_generated());
    }
}
