use slotmap::new_key_type;

new_key_type! {
    pub struct RoomId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
    CorridorMaze,
    CorridorPath,
    RoomConnector,
}

/// Fatal generation outcomes. Failed room placement attempts are not errors;
/// they simply leave fewer rooms than requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// The merge walk exhausted its backtracking stack (or a lone room had no
    /// doorway candidates at all) while the layout was still disconnected.
    /// The grid is too small or the rooms too dense for full connectivity.
    RoomsUnconnectable { merged_rooms: usize, total_rooms: usize },
}
