//! Maze construction over the space rooms left behind: a cell arena at
//! odd/odd coordinates, a randomized backtracker carve, and the corridor
//! commit that retypes cell and passage tiles.

use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::rng;
use super::walk::randomized_spanning_walk;

// Neighbor slot order. Opposite slots pair up as N/S and W/E.
const NORTH: usize = 0;
const SOUTH: usize = 1;
const WEST: usize = 2;
const EAST: usize = 3;

// (dx, dy, slot): geometric neighbors sit two grid steps away.
const STEPS: [(i32, i32, usize); 4] =
    [(0, -2, NORTH), (0, 2, SOUTH), (-2, 0, WEST), (2, 0, EAST)];

fn opposite(slot: usize) -> usize {
    slot ^ 1
}

/// A maze node at an odd/odd grid coordinate. Cells live in a flat arena and
/// reference each other by index; `links[slot]` marks an open passage to the
/// geometric neighbor in the same slot, so links are always a subset of
/// neighbors and are set on both endpoints.
#[derive(Clone, Debug)]
pub struct Cell {
    pos: Pos,
    neighbors: [Option<u32>; 4],
    links: [bool; 4],
}

impl Cell {
    fn new(pos: Pos) -> Self {
        Self { pos, neighbors: [None; 4], links: [false; 4] }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn link_count(&self) -> usize {
        self.links.iter().filter(|&&linked| linked).count()
    }

    /// Arena indices of the cells this one has open passages to.
    pub fn linked_neighbors(&self) -> impl Iterator<Item = u32> {
        (0..4).filter(|&slot| self.links[slot]).filter_map(|slot| self.neighbors[slot])
    }
}

/// Builds the maze in place and returns the cell arena. Cell candidates are
/// odd/odd non-floor positions with no floor among their 8 neighbors (the
/// one-tile buffer around rooms). Candidates without any candidate two steps
/// away cannot participate in linking and are carved directly.
pub(super) fn build(grid: &mut Grid, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let width = grid.width();
    let height = grid.height();

    let mut candidate = vec![false; width * height];
    let mut any_candidate = false;
    for y in (1..height as i32).step_by(2) {
        for x in (1..width as i32).step_by(2) {
            let pos = Pos { y, x };
            if grid.tile(pos).kind == TileKind::Floor {
                continue;
            }
            if grid.count_neighbors8(pos, |t| t.kind == TileKind::Floor) > 0 {
                continue;
            }
            candidate[y as usize * width + x as usize] = true;
            any_candidate = true;
        }
    }
    assert!(any_candidate, "maze build ran on a grid with no carvable space");

    let is_candidate = |pos: Pos| {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < width
            && (pos.y as usize) < height
            && candidate[pos.y as usize * width + pos.x as usize]
    };

    // Arena creation; isolated candidates become corridors immediately and
    // never get an index, so indices stay stable.
    let mut cells: Vec<Cell> = Vec::new();
    let mut index_at: Vec<Option<u32>> = vec![None; width * height];
    for y in (1..height as i32).step_by(2) {
        for x in (1..width as i32).step_by(2) {
            let pos = Pos { y, x };
            if !is_candidate(pos) {
                continue;
            }
            let isolated = STEPS
                .iter()
                .all(|&(dx, dy, _)| !is_candidate(Pos { y: y + dy, x: x + dx }));
            if isolated {
                grid.set(pos, TileKind::CorridorMaze);
                continue;
            }
            let index = cells.len() as u32;
            index_at[y as usize * width + x as usize] = Some(index);
            grid.set_cell(pos, index);
            cells.push(Cell::new(pos));
        }
    }

    for index in 0..cells.len() {
        let pos = cells[index].pos;
        for &(dx, dy, slot) in &STEPS {
            let neighbor = Pos { y: pos.y + dy, x: pos.x + dx };
            if is_candidate(neighbor) {
                cells[index].neighbors[slot] =
                    index_at[neighbor.y as usize * width + neighbor.x as usize];
            }
        }
    }

    // Carve until every cell is linked. Each walk exhausts one geometrically
    // connected region; disjoint regions get fresh walks from a random
    // still-unlinked cell.
    loop {
        let unlinked: Vec<u32> = (0..cells.len() as u32)
            .filter(|&index| cells[index as usize].link_count() == 0)
            .collect();
        if unlinked.is_empty() {
            break;
        }
        let start = unlinked[rng::pick_index(rng, unlinked.len())];
        randomized_spanning_walk(start, |top: u32| {
            let open: Vec<(usize, u32)> = cells[top as usize]
                .neighbors
                .iter()
                .enumerate()
                .filter_map(|(slot, &neighbor)| neighbor.map(|n| (slot, n)))
                .filter(|&(_, neighbor)| cells[neighbor as usize].link_count() == 0)
                .collect();
            if open.is_empty() {
                return None;
            }
            let (slot, next) = open[rng::pick_index(rng, open.len())];
            cells[top as usize].links[slot] = true;
            cells[next as usize].links[opposite(slot)] = true;
            Some(next)
        });
    }

    // Commit: every cell tile becomes a corridor, as does the wall tile at
    // the midpoint of every open link.
    for index in 0..cells.len() {
        let pos = cells[index].pos;
        grid.set(pos, TileKind::CorridorMaze);
        let linked: Vec<u32> = cells[index].linked_neighbors().collect();
        for neighbor in linked {
            let other = cells[neighbor as usize].pos;
            let midpoint = Pos { y: (pos.y + other.y) / 2, x: (pos.x + other.x) / 2 };
            grid.set(midpoint, TileKind::CorridorMaze);
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn every_retained_cell_ends_up_with_at_least_one_link() {
        let mut grid = Grid::new(21, 21);
        let mut rng = ChaCha8Rng::seed_from_u64(18);
        let cells = build(&mut grid, &mut rng);

        assert!(!cells.is_empty());
        assert!(cells.iter().all(|cell| cell.link_count() >= 1));
    }

    #[test]
    fn links_are_bidirectional_and_a_subset_of_geometric_neighbors() {
        let mut grid = Grid::new(21, 21);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let cells = build(&mut grid, &mut rng);

        for (index, cell) in cells.iter().enumerate() {
            for neighbor in cell.linked_neighbors() {
                let back: Vec<u32> = cells[neighbor as usize].linked_neighbors().collect();
                assert!(back.contains(&(index as u32)), "links must be mutual");
                assert!(cell.neighbors.contains(&Some(neighbor)));
            }
        }
    }

    #[test]
    fn empty_grid_maze_carves_every_odd_odd_tile() {
        let mut grid = Grid::new(11, 11);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        build(&mut grid, &mut rng);

        for y in (1..11).step_by(2) {
            for x in (1..11).step_by(2) {
                assert_eq!(grid.tile(Pos { y, x }).kind, TileKind::CorridorMaze);
            }
        }
        // Even/even positions are never carved by the maze.
        for y in (0..11).step_by(2) {
            for x in (0..11).step_by(2) {
                assert_eq!(grid.tile(Pos { y, x }).kind, TileKind::Wall);
            }
        }
    }

    #[test]
    fn an_isolated_candidate_is_carved_without_entering_the_arena() {
        // 3x3 grid: (1,1) is the only candidate and has no neighbor two away.
        let mut grid = Grid::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cells = build(&mut grid, &mut rng);

        assert!(cells.is_empty());
        assert_eq!(grid.tile(Pos { y: 1, x: 1 }).kind, TileKind::CorridorMaze);
        assert_eq!(grid.tile(Pos { y: 1, x: 1 }).cell, None);
    }

    #[test]
    #[should_panic(expected = "no carvable space")]
    fn maze_on_a_fully_floored_grid_is_a_precondition_violation() {
        let mut grid = Grid::new(7, 7);
        for y in 0..7 {
            for x in 0..7 {
                grid.set(Pos { y, x }, TileKind::Floor);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        build(&mut grid, &mut rng);
    }
}
