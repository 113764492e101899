use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use game_core::{Dungeon, GenerationConfig, TileKind, generate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First seed to render
    #[arg(short, long, default_value_t = 18)]
    seed: u64,
    /// Number of consecutive seeds to render
    #[arg(short, long, default_value_t = 1)]
    count: u64,
    #[arg(long, default_value_t = 81)]
    width: usize,
    #[arg(long, default_value_t = 41)]
    height: usize,
    #[arg(long, default_value_t = 5)]
    room_min: i32,
    #[arg(long, default_value_t = 11)]
    room_max: i32,
    /// Room placement attempts per generation
    #[arg(long, default_value_t = 400)]
    attempts: u32,
    /// Keep the maze corridors no carved path ended up using
    #[arg(long)]
    keep_unused_corridors: bool,
    /// Emit each layout as JSON instead of ASCII art
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct LayoutDump {
    seed: u64,
    width: usize,
    height: usize,
    rooms: usize,
    /// One string per row; W wall, F floor, M maze corridor, P carved path,
    /// C connector.
    tiles: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GenerationConfig {
        width: args.width,
        height: args.height,
        room_min: args.room_min,
        room_max: args.room_max,
        room_attempts: args.attempts,
        seal_unused: !args.keep_unused_corridors,
        ..GenerationConfig::default()
    };

    for seed in args.seed..args.seed.saturating_add(args.count) {
        let started = Instant::now();
        let dungeon = generate(seed, &config)
            .map_err(|e| anyhow::anyhow!("Generation failed on seed {seed}: {e:?}"))?;
        let elapsed = started.elapsed();

        if args.json {
            println!("{}", serde_json::to_string(&dump(seed, &dungeon))?);
        } else {
            print!("{}", render(&dungeon));
            println!("SEED: {seed}");
            println!("Rooms: {}", dungeon.room_count());
            println!("Generation time: {} ms", elapsed.as_millis());
        }
    }
    Ok(())
}

/// ASCII view of the layout. Walls are drawn only where they border carved
/// space, so untouched rock reads as blank.
fn render(dungeon: &Dungeon) -> String {
    let mut out = String::with_capacity((dungeon.width() + 1) * dungeon.height());
    for y in 0..dungeon.height() as i32 {
        for x in 0..dungeon.width() as i32 {
            let Some(tile) = dungeon.tile_at(x, y) else {
                continue;
            };
            let glyph = match tile.kind {
                TileKind::Wall => {
                    let carved = dungeon.grid().count_neighbors8(tile.pos, |t| {
                        t.kind != TileKind::Wall
                    });
                    if carved > 0 { '█' } else { ' ' }
                }
                TileKind::Floor | TileKind::CorridorMaze => ' ',
                TileKind::CorridorPath => '░',
                TileKind::RoomConnector => '.',
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn dump(seed: u64, dungeon: &Dungeon) -> LayoutDump {
    let mut tiles = Vec::with_capacity(dungeon.height());
    for y in 0..dungeon.height() as i32 {
        let mut row = String::with_capacity(dungeon.width());
        for x in 0..dungeon.width() as i32 {
            let Some(tile) = dungeon.tile_at(x, y) else {
                continue;
            };
            row.push(match tile.kind {
                TileKind::Wall => 'W',
                TileKind::Floor => 'F',
                TileKind::CorridorMaze => 'M',
                TileKind::CorridorPath => 'P',
                TileKind::RoomConnector => 'C',
            });
        }
        tiles.push(row);
    }
    LayoutDump {
        seed,
        width: dungeon.width(),
        height: dungeon.height(),
        rooms: dungeon.room_count(),
        tiles,
    }
}
