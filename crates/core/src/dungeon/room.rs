//! Room rectangles: randomized placement with collision avoidance, halo
//! scanning, and connector upkeep.

use std::mem;

use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, RoomId, TileKind};

use super::grid::Grid;
use super::rng;

// Rooms stay one tile off the outer grid border.
const MAP_MARGIN: i32 = 1;
// Chebyshev radius inside which doorways are considered adjacent.
const NEARBY_CONNECTOR_RADIUS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoomRect {
    pub fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn expanded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }
}

#[derive(Clone, Debug)]
pub struct Room {
    pub rect: RoomRect,
    pub merged: bool,
    pub connectors: Vec<Pos>,
}

impl Room {
    pub(super) fn new(rect: RoomRect) -> Self {
        Self { rect, merged: false, connectors: Vec::new() }
    }

    /// Interior plus a one-tile halo, row-major. Placement guarantees the
    /// halo never leaves the grid.
    pub(super) fn halo_tiles(&self) -> impl Iterator<Item = Pos> {
        let halo = self.rect.expanded(1);
        (halo.y..=halo.bottom())
            .flat_map(move |y| (halo.x..=halo.right()).map(move |x| Pos { y, x }))
    }

    /// Decimates the connector list: each entry survives with probability
    /// 1/chance, the rest revert to plain walls.
    pub(super) fn remove_connectors(&mut self, grid: &mut Grid, rng: &mut ChaCha8Rng, chance: u32) {
        let connectors = mem::take(&mut self.connectors);
        for connector in connectors {
            if rng::one_in(rng, chance) {
                self.connectors.push(connector);
            } else {
                grid.set(connector, TileKind::Wall);
            }
        }
    }

    /// Drops every connector within `NEARBY_CONNECTOR_RADIUS` of `point` so a
    /// freshly carved doorway cannot gain an adjacent twin.
    pub(super) fn remove_nearby_connectors(&mut self, grid: &mut Grid, point: Pos) {
        let connectors = mem::take(&mut self.connectors);
        for connector in connectors {
            let near = (connector.x - point.x).abs() <= NEARBY_CONNECTOR_RADIUS
                && (connector.y - point.y).abs() <= NEARBY_CONNECTOR_RADIUS;
            if near {
                grid.set(connector, TileKind::Wall);
            } else {
                self.connectors.push(connector);
            }
        }
    }
}

/// One placement attempt: picks odd dimensions in `[min, max]` and an
/// odd-aligned position inside the map margin, then rejects the candidate if
/// its one-tile-expanded box touches the grid border or any existing floor.
/// Rejection is a normal outcome; the caller retries within its budget.
pub(super) fn try_place(
    grid: &Grid,
    rng: &mut ChaCha8Rng,
    min: i32,
    max: i32,
) -> Option<RoomRect> {
    debug_assert!(min >= 1 && min <= max);

    let mut width = rng::range_inclusive(rng, min, max);
    let mut height = rng::range_inclusive(rng, min, max);
    if width % 2 == 0 {
        width -= 1;
    }
    if height % 2 == 0 {
        height -= 1;
    }

    let max_x = grid.width() as i32 - width - MAP_MARGIN;
    let max_y = grid.height() as i32 - height - MAP_MARGIN;
    if max_x <= MAP_MARGIN || max_y <= MAP_MARGIN {
        return None;
    }

    let mut x = rng::range_inclusive(rng, MAP_MARGIN, max_x);
    let mut y = rng::range_inclusive(rng, MAP_MARGIN, max_y);
    if x % 2 == 0 {
        x -= 1;
    }
    if y % 2 == 0 {
        y -= 1;
    }

    let rect = RoomRect { x, y, width, height };
    if collides(grid, rect) { None } else { Some(rect) }
}

fn collides(grid: &Grid, rect: RoomRect) -> bool {
    let expanded = rect.expanded(1);
    for y in expanded.y..=expanded.bottom() {
        for x in expanded.x..=expanded.right() {
            let pos = Pos { y, x };
            if !grid.in_bounds(pos) || grid.is_border(pos) {
                return true;
            }
            if grid.tile(pos).kind == TileKind::Floor {
                return true;
            }
        }
    }
    false
}

/// Commits a successful placement: paints the interior as floor owned by
/// `id`. Nothing of a failed attempt ever reaches the grid.
pub(super) fn carve(grid: &mut Grid, rect: RoomRect, id: RoomId) {
    for y in rect.y..=rect.bottom() {
        for x in rect.x..=rect.right() {
            grid.set_room(Pos { y, x }, TileKind::Floor, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use slotmap::SlotMap;

    use super::*;

    fn room_key() -> RoomId {
        let mut rooms: SlotMap<RoomId, ()> = SlotMap::with_key();
        rooms.insert(())
    }

    #[test]
    fn placements_are_odd_sized_odd_aligned_and_off_the_border() {
        let grid = Grid::new(41, 21);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut successes = 0;
        for _ in 0..200 {
            if let Some(rect) = try_place(&grid, &mut rng, 5, 11) {
                successes += 1;
                assert_eq!(rect.width % 2, 1);
                assert_eq!(rect.height % 2, 1);
                assert_eq!(rect.x % 2, 1);
                assert_eq!(rect.y % 2, 1);
                assert!(rect.x >= 2 && rect.y >= 2, "expanded box must clear the border");
                assert!(rect.right() <= 41 - 3 && rect.bottom() <= 21 - 3);
            }
        }
        assert!(successes > 0, "an empty grid should accept placements");
    }

    #[test]
    fn placement_rejects_candidates_whose_margin_overlaps_floor() {
        let mut grid = Grid::new(15, 15);
        // Fill everything but the border with floor; no candidate can fit.
        for y in 1..14 {
            for x in 1..14 {
                grid.set(Pos { y, x }, TileKind::Floor);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert!((0..100).all(|_| try_place(&grid, &mut rng, 5, 7).is_none()));
    }

    #[test]
    fn eleven_by_eleven_admits_exactly_one_five_by_five_placement() {
        // Only (3,3) keeps the expanded box off the border on an 11x11 grid.
        let grid = Grid::new(11, 11);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut placed = Vec::new();
        for _ in 0..300 {
            if let Some(rect) = try_place(&grid, &mut rng, 5, 5) {
                placed.push(rect);
            }
        }
        assert!(!placed.is_empty());
        assert!(placed.iter().all(|&r| r == RoomRect { x: 3, y: 3, width: 5, height: 5 }));
    }

    #[test]
    fn carve_paints_the_interior_with_the_room_id() {
        let mut grid = Grid::new(11, 11);
        let id = room_key();
        let rect = RoomRect { x: 3, y: 3, width: 5, height: 5 };
        carve(&mut grid, rect, id);

        for tile in grid.tiles() {
            if rect.contains(tile.pos) {
                assert_eq!(tile.kind, TileKind::Floor);
                assert_eq!(tile.room, Some(id));
            } else {
                assert_eq!(tile.kind, TileKind::Wall);
            }
        }
    }

    #[test]
    fn remove_connectors_with_chance_one_keeps_everything() {
        let mut grid = Grid::new(11, 11);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut room = Room::new(RoomRect { x: 3, y: 3, width: 5, height: 5 });
        room.connectors = vec![Pos { y: 2, x: 3 }, Pos { y: 2, x: 5 }];
        for &pos in &room.connectors {
            grid.set(pos, TileKind::RoomConnector);
        }

        room.remove_connectors(&mut grid, &mut rng, 1);
        assert_eq!(room.connectors.len(), 2);
        assert!(room.connectors.iter().all(|&p| grid.tile(p).kind == TileKind::RoomConnector));
    }

    #[test]
    fn remove_nearby_connectors_drops_only_connectors_within_the_radius() {
        let mut grid = Grid::new(15, 15);
        let mut room = Room::new(RoomRect { x: 3, y: 3, width: 5, height: 5 });
        let near = Pos { y: 2, x: 4 };
        let far = Pos { y: 8, x: 7 };
        room.connectors = vec![near, far];
        grid.set(near, TileKind::RoomConnector);
        grid.set(far, TileKind::RoomConnector);

        room.remove_nearby_connectors(&mut grid, Pos { y: 2, x: 3 });
        assert_eq!(room.connectors, vec![far]);
        assert_eq!(grid.tile(near).kind, TileKind::Wall);
        assert_eq!(grid.tile(far).kind, TileKind::RoomConnector);
    }

    #[test]
    fn halo_tiles_cover_the_interior_plus_one_ring() {
        let room = Room::new(RoomRect { x: 3, y: 3, width: 3, height: 3 });
        let halo: Vec<Pos> = room.halo_tiles().collect();
        assert_eq!(halo.len(), 25);
        assert_eq!(halo.first(), Some(&Pos { y: 2, x: 2 }));
        assert_eq!(halo.last(), Some(&Pos { y: 6, x: 6 }));
    }
}
