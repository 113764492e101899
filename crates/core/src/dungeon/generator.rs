//! The dungeon facade: one grid, its rooms, and its maze cells, advanced
//! through the generation passes in order.

use rand_chacha::ChaCha8Rng;

use crate::types::{GenerationError, Pos, TileKind};

use super::grid::{Grid, Tile};
use super::manager::RoomManager;
use super::maze::{self, Cell};
use super::room::Room;

#[derive(Clone)]
pub struct Dungeon {
    grid: Grid,
    manager: RoomManager,
    cells: Vec<Cell>,
}

impl Dungeon {
    /// An all-wall dungeon of the given dimensions, ready for the pipeline.
    pub fn new(width: usize, height: usize) -> Self {
        Self { grid: Grid::new(width, height), manager: RoomManager::new(), cells: Vec::new() }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.grid.get(Pos { y, x })
    }

    pub fn tiles_by_type(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.grid.tiles_by_type(kind)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.manager.rooms()
    }

    pub fn room_count(&self) -> usize {
        self.manager.room_count()
    }

    /// The maze cell arena; tile `cell` indices point into this slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn carve_rooms(&mut self, rng: &mut ChaCha8Rng, min: i32, max: i32, attempts: u32) {
        self.manager.carve_rooms(&mut self.grid, rng, min, max, attempts);
    }

    pub fn add_maze(&mut self, rng: &mut ChaCha8Rng) {
        self.cells = maze::build(&mut self.grid, rng);
    }

    pub fn add_connectors(&mut self) {
        self.manager.add_connectors(&mut self.grid);
    }

    pub fn connect_rooms(
        &mut self,
        rng: &mut ChaCha8Rng,
        survival_chance: u32,
    ) -> Result<(), GenerationError> {
        self.manager.connect_rooms(&mut self.grid, rng, survival_chance)
    }

    pub fn connect_loose_connectors(&mut self) {
        self.manager.connect_loose_connectors(&mut self.grid);
    }

    /// Retypes every maze corridor the carved paths never claimed back to
    /// wall, leaving only rooms, doorways, and used corridors.
    pub fn seal_unused_corridors(&mut self) {
        let unused: Vec<Pos> =
            self.grid.tiles_by_type(TileKind::CorridorMaze).map(|tile| tile.pos).collect();
        for pos in unused {
            self.grid.set(pos, TileKind::Wall);
        }
    }

    /// A deterministic byte image of the generated layout, for fingerprinting
    /// and comparing runs. Covers tile kinds and room geometry; scratch state
    /// like cell indices is deliberately left out.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.grid.width() * self.grid.height() + 64);
        bytes.extend_from_slice(&(self.grid.width() as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.grid.height() as u32).to_le_bytes());
        for tile in self.grid.tiles() {
            bytes.push(kind_byte(tile.kind));
        }
        bytes.extend_from_slice(&(self.manager.room_count() as u32).to_le_bytes());
        for room in self.manager.rooms() {
            bytes.extend_from_slice(&room.rect.x.to_le_bytes());
            bytes.extend_from_slice(&room.rect.y.to_le_bytes());
            bytes.extend_from_slice(&room.rect.width.to_le_bytes());
            bytes.extend_from_slice(&room.rect.height.to_le_bytes());
            bytes.push(u8::from(room.merged));
        }
        bytes
    }
}

fn kind_byte(kind: TileKind) -> u8 {
    match kind {
        TileKind::Wall => 0,
        TileKind::Floor => 1,
        TileKind::CorridorMaze => 2,
        TileKind::CorridorPath => 3,
        TileKind::RoomConnector => 4,
    }
}
