pub mod dungeon;
pub mod types;

pub use dungeon::{
    Cell, Dungeon, GenerationConfig, Grid, Pathfinder, Room, RoomRect, Tile, UNREACHABLE,
    generate, is_walkable,
};
pub use types::*;
