//! Tile grid primitives shared by every generation pass.

use crate::types::{Pos, RoomId, TileKind};

/// One grid square. Tiles are created once per in-bounds position and only
/// ever retyped in place; carving never adds or removes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub pos: Pos,
    pub kind: TileKind,
    /// Index into the maze cell arena, set during maze construction.
    pub cell: Option<u32>,
    pub room: Option<RoomId>,
}

// Cardinal offsets in fixed N, S, W, E order.
const OFFSETS_4: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile {
                    pos: Pos { y: y as i32, x: x as i32 },
                    kind: TileKind::Wall,
                    cell: None,
                    room: None,
                });
            }
        }
        Self { width, height, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0
            || pos.y == 0
            || pos.x == self.width as i32 - 1
            || pos.y == self.height as i32 - 1
    }

    /// `None` for out-of-bounds positions; such positions never hold a tile.
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.tiles[self.index(pos)])
    }

    /// Row-major iteration over every tile.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Lazy, restartable, row-major iteration over tiles of one kind.
    pub fn tiles_by_type(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |tile| tile.kind == kind)
    }

    /// In-bounds cardinal neighbors in fixed N, S, W, E order (0 to 4 items).
    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> {
        OFFSETS_4
            .iter()
            .map(move |&(dx, dy)| Pos { y: pos.y + dy, x: pos.x + dx })
            .filter(|&neighbor| self.in_bounds(neighbor))
    }

    pub fn count_neighbors4(&self, pos: Pos, predicate: impl Fn(&Tile) -> bool) -> usize {
        self.neighbors4(pos).filter(|&neighbor| predicate(self.tile(neighbor))).count()
    }

    pub fn count_neighbors8(&self, pos: Pos, predicate: impl Fn(&Tile) -> bool) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Pos { y: pos.y + dy, x: pos.x + dx };
                if self.in_bounds(neighbor) && predicate(self.tile(neighbor)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// In-bounds lookup for pipeline internals that already hold a valid
    /// position (room halos, enumerated neighbors, cell positions).
    pub(super) fn tile(&self, pos: Pos) -> &Tile {
        &self.tiles[self.index(pos)]
    }

    pub(super) fn set(&mut self, pos: Pos, kind: TileKind) {
        let index = self.index(pos);
        self.tiles[index].kind = kind;
        self.tiles[index].room = None;
    }

    pub(super) fn set_room(&mut self, pos: Pos, kind: TileKind, room: RoomId) {
        let index = self.index(pos);
        self.tiles[index].kind = kind;
        self.tiles[index].room = Some(room);
    }

    pub(super) fn set_cell(&mut self, pos: Pos, cell: u32) {
        let index = self.index(pos);
        self.tiles[index].cell = Some(cell);
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(self.in_bounds(pos), "tile position out of bounds: {pos:?}");
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
