//! Room bookkeeping and the merge passes that join rooms into one connected
//! dungeon.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

use crate::types::{GenerationError, Pos, RoomId, TileKind};

use super::grid::Grid;
use super::pathfinder::is_walkable;
use super::rng;
use super::room::{self, Room};
use super::walk::randomized_spanning_walk;

/// Owns every placed room. A connector position may appear in more than one
/// room's list when two rooms share a wall; list membership is what makes a
/// room an owner of a connector.
#[derive(Clone, Default)]
pub struct RoomManager {
    rooms: SlotMap<RoomId, Room>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self { rooms: SlotMap::with_key() }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Runs `attempts` placement attempts and carves every one that lands.
    /// Failed attempts leave no trace on the grid.
    pub(super) fn carve_rooms(
        &mut self,
        grid: &mut Grid,
        rng: &mut ChaCha8Rng,
        min: i32,
        max: i32,
        attempts: u32,
    ) {
        for _ in 0..attempts {
            if let Some(rect) = room::try_place(grid, rng, min, max) {
                let id = self.rooms.insert(Room::new(rect));
                room::carve(grid, rect, id);
            }
        }
    }

    /// Scans every room's halo for doorway candidates: a non-border wall with
    /// exactly one floor and one maze-corridor neighbor, or with exactly two
    /// floor neighbors (a wall shared by two rooms). A tile another room
    /// already claimed qualifies again, which is how shared connectors end up
    /// in both owners' lists.
    pub(super) fn add_connectors(&mut self, grid: &mut Grid) {
        let keys: Vec<RoomId> = self.rooms.keys().collect();
        for key in keys {
            let halo: Vec<Pos> = self.rooms[key].halo_tiles().collect();
            for pos in halo {
                let kind = grid.tile(pos).kind;
                if kind != TileKind::Wall && kind != TileKind::RoomConnector {
                    continue;
                }
                if grid.is_border(pos) {
                    continue;
                }
                let floor = grid.count_neighbors4(pos, |t| t.kind == TileKind::Floor);
                let corridor =
                    grid.count_neighbors4(pos, |t| t.kind == TileKind::CorridorMaze);
                if (floor == 1 && corridor == 1) || floor == 2 {
                    grid.set(pos, TileKind::RoomConnector);
                    self.rooms[key].connectors.push(pos);
                }
            }
        }
    }

    /// Merges every room into one connected dungeon via a randomized
    /// depth-first walk over rooms, then decimates the leftover connectors.
    /// Fails when the walk unwinds with unmerged rooms remaining.
    pub(super) fn connect_rooms(
        &mut self,
        grid: &mut Grid,
        rng: &mut ChaCha8Rng,
        survival_chance: u32,
    ) -> Result<(), GenerationError> {
        if self.rooms.is_empty() {
            return Ok(());
        }

        // A lone room without a single doorway can never join the maze.
        if self.rooms.len() == 1
            && self.rooms.values().all(|room| room.connectors.is_empty())
            && grid.tiles_by_type(TileKind::CorridorMaze).next().is_some()
        {
            return Err(GenerationError::RoomsUnconnectable { merged_rooms: 0, total_rooms: 1 });
        }

        let keys: Vec<RoomId> = self.rooms.keys().collect();
        let start = keys[rng::pick_index(rng, keys.len())];
        randomized_spanning_walk(start, |key: RoomId| self.merge_step(grid, rng, key));

        let merged_rooms = self.rooms.values().filter(|room| room.merged).count();
        let total_rooms = self.rooms.len();
        if merged_rooms < total_rooms {
            return Err(GenerationError::RoomsUnconnectable { merged_rooms, total_rooms });
        }

        for key in keys {
            self.rooms[key].remove_connectors(grid, rng, survival_chance);
        }
        Ok(())
    }

    /// One step of the merge walk: marks `key` merged, then tries its
    /// connectors in random order until one reaches a connector of another
    /// unmerged room. On success carves the corridor, retires doorways near
    /// both endpoints, and hands the walk the newly merged room. `None`
    /// backtracks.
    fn merge_step(
        &mut self,
        grid: &mut Grid,
        rng: &mut ChaCha8Rng,
        key: RoomId,
    ) -> Option<RoomId> {
        self.rooms[key].merged = true;
        if self.rooms.values().all(|room| room.merged) {
            return None;
        }

        let mut unchecked = self.rooms[key].connectors.clone();
        let mut path = Vec::new();
        while !unchecked.is_empty() {
            let start = unchecked.swap_remove(rng::pick_index(rng, unchecked.len()));
            let Some(goal) = self.find_nearest_connector(grid, start, &mut path) else {
                continue;
            };

            self.rooms[key].remove_nearby_connectors(grid, start);

            let target = self
                .rooms
                .iter()
                .find(|(_, room)| room.connectors.contains(&goal) && !room.merged)
                .map(|(target, _)| target)
                .expect("goal connector must belong to an unmerged room");
            self.rooms[target].remove_nearby_connectors(grid, goal);

            for &pos in &path {
                grid.set(pos, TileKind::CorridorPath);
            }
            return Some(target);
        }
        None
    }

    /// Breadth-first search from `start` over walkable corridor tiles for the
    /// nearest connector owned by an unmerged room that does not also own
    /// `start`. A connector shared with another unmerged room is its own
    /// goal: the two rooms touch and the path is the single shared tile.
    /// Fills `path` with the full tile sequence from `start` to the goal.
    fn find_nearest_connector(&self, grid: &Grid, start: Pos, path: &mut Vec<Pos>) -> Option<Pos> {
        let owners: Vec<RoomId> = self.owners_of(start).collect();
        if owners.len() > 1 && owners.iter().any(|&owner| !self.rooms[owner].merged) {
            path.clear();
            path.push(start);
            return Some(start);
        }

        let width = grid.width();
        let mut visited = vec![false; width * grid.height()];
        let mut parent: Vec<Option<u32>> = vec![None; width * grid.height()];
        let index = |pos: Pos| pos.y as usize * width + pos.x as usize;

        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[index(start)] = true;

        while let Some(pos) = queue.pop_front() {
            for neighbor in grid.neighbors4(pos) {
                if visited[index(neighbor)] {
                    continue;
                }
                let kind = grid.tile(neighbor).kind;

                if kind == TileKind::RoomConnector {
                    let reachable = self.owners_of(neighbor).any(|owner| {
                        let room = &self.rooms[owner];
                        !room.merged && !room.connectors.contains(&start)
                    });
                    if reachable {
                        path.clear();
                        path.push(neighbor);
                        let mut cursor = pos;
                        loop {
                            path.push(cursor);
                            match parent[index(cursor)] {
                                Some(previous) => {
                                    cursor = Pos {
                                        y: (previous as usize / width) as i32,
                                        x: (previous as usize % width) as i32,
                                    };
                                }
                                None => break,
                            }
                        }
                        debug_assert_eq!(path.last(), Some(&start));
                        path.reverse();
                        return Some(neighbor);
                    }
                    // Dead connector; never walk through it.
                    visited[index(neighbor)] = true;
                    continue;
                }

                if is_walkable(kind) {
                    visited[index(neighbor)] = true;
                    parent[index(neighbor)] = Some(index(pos) as u32);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }

    fn owners_of(&self, connector: Pos) -> impl Iterator<Item = RoomId> {
        self.rooms
            .iter()
            .filter(move |(_, room)| room.connectors.contains(&connector))
            .map(|(key, _)| key)
    }

    /// Attaches the connectors that survived decimation to the corridor
    /// network. Entries whose tile was retyped by an earlier pass are stale
    /// and silently dropped; connectors with no reachable corridor are kept
    /// as-is.
    pub(super) fn connect_loose_connectors(&mut self, grid: &mut Grid) {
        let keys: Vec<RoomId> = self.rooms.keys().collect();
        for key in keys {
            let loose = self.rooms[key].connectors.clone();
            for connector in loose {
                if grid.tile(connector).kind != TileKind::RoomConnector {
                    self.rooms[key].connectors.retain(|&pos| pos != connector);
                    continue;
                }
                let mut path = Vec::new();
                if find_nearest_corridor(grid, connector, &mut path).is_none() {
                    continue;
                }
                for &pos in &path {
                    grid.set(pos, TileKind::CorridorPath);
                }
                self.rooms[key].connectors.retain(|&pos| pos != connector);
            }
        }
    }
}

/// Breadth-first search from `start` over walkable tiles for the nearest
/// carved corridor tile. Fills `path` with the tile sequence from `start` to
/// the found corridor inclusive.
fn find_nearest_corridor(grid: &Grid, start: Pos, path: &mut Vec<Pos>) -> Option<Pos> {
    let width = grid.width();
    let mut visited = vec![false; width * grid.height()];
    let mut parent: Vec<Option<u32>> = vec![None; width * grid.height()];
    let index = |pos: Pos| pos.y as usize * width + pos.x as usize;

    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited[index(start)] = true;

    while let Some(pos) = queue.pop_front() {
        for neighbor in grid.neighbors4(pos) {
            if visited[index(neighbor)] {
                continue;
            }
            let kind = grid.tile(neighbor).kind;

            if kind == TileKind::CorridorPath {
                path.clear();
                path.push(neighbor);
                let mut cursor = pos;
                loop {
                    path.push(cursor);
                    match parent[index(cursor)] {
                        Some(previous) => {
                            cursor = Pos {
                                y: (previous as usize / width) as i32,
                                x: (previous as usize % width) as i32,
                            };
                        }
                        None => break,
                    }
                }
                path.reverse();
                return Some(neighbor);
            }

            if is_walkable(kind) {
                visited[index(neighbor)] = true;
                parent[index(neighbor)] = Some(index(pos) as u32);
                queue.push_back(neighbor);
            }
        }
    }
    None
}
