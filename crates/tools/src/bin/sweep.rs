use std::collections::VecDeque;

use anyhow::Result;
use clap::Parser;
use game_core::{Dungeon, GenerationConfig, Pos, TileKind, generate};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Meta-seed the per-run seeds are drawn from
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 100)]
    runs: u32,
    #[arg(long, default_value_t = 81)]
    width: usize,
    #[arg(long, default_value_t = 41)]
    height: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Starting generation sweep on meta-seed {} for {} runs...", args.seed, args.runs);

    let config =
        GenerationConfig { width: args.width, height: args.height, ..GenerationConfig::default() };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut unconnectable = 0_u32;

    for _ in 0..args.runs {
        let run_seed = rng.next_u64();
        match generate(run_seed, &config) {
            Ok(dungeon) => {
                assert!(
                    dungeon.rooms().all(|room| room.merged),
                    "Invariant failed: unmerged room on seed {run_seed}"
                );
                assert!(
                    dungeon.tiles_by_type(TileKind::CorridorMaze).next().is_none(),
                    "Invariant failed: unsealed corridor on seed {run_seed}"
                );
                assert!(
                    is_fully_connected(&dungeon),
                    "Invariant failed: disconnected layout on seed {run_seed}"
                );
            }
            Err(error) => {
                println!("Seed {run_seed} unconnectable: {error:?}");
                unconnectable += 1;
            }
        }
    }

    println!("Sweep completed: {} runs, {} unconnectable.", args.runs, unconnectable);
    Ok(())
}

/// Flood-fills floors and carved paths from an arbitrary floor tile and
/// checks nothing walkable was left out.
fn is_fully_connected(dungeon: &Dungeon) -> bool {
    let passable = |kind: TileKind| matches!(kind, TileKind::Floor | TileKind::CorridorPath);
    let Some(start) = dungeon.tiles_by_type(TileKind::Floor).map(|tile| tile.pos).next() else {
        return true;
    };

    let mut visited = vec![false; dungeon.width() * dungeon.height()];
    let index = |pos: Pos| pos.y as usize * dungeon.width() + pos.x as usize;
    let mut queue = VecDeque::new();
    visited[index(start)] = true;
    queue.push_back(start);
    let mut reached = 1_usize;

    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = Pos { y: pos.y + dy, x: pos.x + dx };
            let Some(tile) = dungeon.tile_at(next.x, next.y) else {
                continue;
            };
            if visited[index(next)] || !passable(tile.kind) {
                continue;
            }
            visited[index(next)] = true;
            reached += 1;
            queue.push_back(next);
        }
    }

    let total = dungeon.tiles_by_type(TileKind::Floor).count()
        + dungeon.tiles_by_type(TileKind::CorridorPath).count();
    reached == total
}
