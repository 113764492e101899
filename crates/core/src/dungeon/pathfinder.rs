//! Breadth-first shortest paths over walkable corridor tiles.
//!
//! The pathfinder owns its scratch buffers and is meant to be reused across
//! many queries on same-sized grids; each call clears and refills the buffers
//! instead of reallocating.

use crate::types::{Pos, TileKind};

use super::grid::Grid;

/// Distance returned when no walkable route exists.
pub const UNREACHABLE: u32 = u32::MAX;

// Expansion order: east, west, south, north.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Corridor tiles are traversable; rooms, walls, and pending connectors are
/// not.
pub fn is_walkable(kind: TileKind) -> bool {
    matches!(kind, TileKind::CorridorMaze | TileKind::CorridorPath)
}

pub struct Pathfinder {
    width: usize,
    height: usize,
    visited: Vec<bool>,
    parent: Vec<Option<u32>>,
    queue: Vec<(u32, u32)>,
    head: usize,
    tail: usize,
}

impl Pathfinder {
    pub fn new(grid: &Grid) -> Self {
        let size = grid.width() * grid.height();
        Self {
            width: grid.width(),
            height: grid.height(),
            visited: vec![false; size],
            parent: vec![None; size],
            queue: vec![(0, 0); size],
            head: 0,
            tail: 0,
        }
    }

    /// Shortest walkable distance from `start` to `goal`, in steps. `start`
    /// itself need not be walkable (connector tiles launch searches from
    /// their own position). When `path` is given it receives the full tile
    /// sequence from `start` to `goal` inclusive. Returns [`UNREACHABLE`]
    /// when no route exists.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: Pos,
        goal: Pos,
        mut path: Option<&mut Vec<Pos>>,
    ) -> u32 {
        assert!(
            grid.width() == self.width && grid.height() == self.height,
            "pathfinder buffers were sized for a different grid"
        );
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return UNREACHABLE;
        }
        if start == goal {
            if let Some(path) = path.as_deref_mut() {
                path.clear();
                path.push(start);
            }
            return 0;
        }

        self.visited.fill(false);
        self.parent.fill(None);
        self.head = 0;
        self.tail = 0;

        let start_index = self.index(start);
        self.visited[start_index] = true;
        self.enqueue(start_index as u32, 0);

        while let Some((index, distance)) = self.dequeue() {
            let pos = self.pos_of(index);
            for &(dx, dy) in &DIRECTIONS {
                let next = Pos { y: pos.y + dy, x: pos.x + dx };
                if !grid.in_bounds(next) {
                    continue;
                }
                let next_index = self.index(next);
                if self.visited[next_index] {
                    continue;
                }
                self.visited[next_index] = true;
                if !is_walkable(grid.tile(next).kind) {
                    continue;
                }
                if next == goal {
                    if let Some(path) = path.as_deref_mut() {
                        self.reconstruct(start, goal, pos, path);
                    }
                    return distance + 1;
                }
                self.parent[next_index] = Some(index);
                self.enqueue(next_index as u32, distance + 1);
            }
        }
        UNREACHABLE
    }

    /// Rebuilds the tile sequence by following parent links back from the
    /// tile the goal was discovered from.
    fn reconstruct(&self, start: Pos, goal: Pos, discovered_from: Pos, path: &mut Vec<Pos>) {
        path.clear();
        path.push(goal);
        let mut cursor = self.index(discovered_from) as u32;
        loop {
            path.push(self.pos_of(cursor));
            match self.parent[cursor as usize] {
                Some(previous) => cursor = previous,
                None => break,
            }
        }
        debug_assert_eq!(path.last(), Some(&start));
        path.reverse();
    }

    fn enqueue(&mut self, index: u32, distance: u32) {
        self.queue[self.tail] = (index, distance);
        self.tail = (self.tail + 1) % self.queue.len();
    }

    fn dequeue(&mut self) -> Option<(u32, u32)> {
        if self.head == self.tail {
            return None;
        }
        let entry = self.queue[self.head];
        self.head = (self.head + 1) % self.queue.len();
        Some(entry)
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    fn pos_of(&self, index: u32) -> Pos {
        Pos { y: (index as usize / self.width) as i32, x: (index as usize % self.width) as i32 }
    }
}
