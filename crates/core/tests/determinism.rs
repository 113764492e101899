use core::{GenerationConfig, TileKind, generate};

use xxhash_rust::xxh3::xxh3_64;

#[test]
fn test_determinism_identical_seeds_produce_same_bytes() {
    let config = GenerationConfig::default();
    let first = generate(12345, &config).expect("default config should generate");
    let second = generate(12345, &config).expect("default config should generate");

    assert_eq!(
        first.canonical_bytes(),
        second.canonical_bytes(),
        "Identical runs must produce identical layouts"
    );
    assert_eq!(xxh3_64(&first.canonical_bytes()), xxh3_64(&second.canonical_bytes()));
}

#[test]
fn test_determinism_different_seeds_produce_different_layouts() {
    let config = GenerationConfig::default();
    let first = generate(123, &config).expect("default config should generate");
    let second = generate(456, &config).expect("default config should generate");

    assert_ne!(
        first.canonical_bytes(),
        second.canonical_bytes(),
        "Different seeds should produce different layouts"
    );
}

#[test]
fn test_determinism_holds_across_many_repeated_runs() {
    let config = GenerationConfig { width: 41, height: 21, ..GenerationConfig::default() };
    let reference = generate(777, &config).expect("config should generate");
    let reference_hash = xxh3_64(&reference.canonical_bytes());

    for _ in 0..5 {
        let run = generate(777, &config).expect("config should generate");
        assert_eq!(xxh3_64(&run.canonical_bytes()), reference_hash);
    }
}

#[test]
fn test_determinism_interleaved_runs_do_not_share_state() {
    use core::Dungeon;
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    let config = GenerationConfig { width: 41, height: 21, ..GenerationConfig::default() };
    let expected_a = generate(5, &config).expect("config should generate");
    let expected_b = generate(6, &config).expect("config should generate");

    // Advance two independently seeded dungeons stage by stage, alternating
    // between them; each must match its monolithic run.
    let mut rng_a = ChaCha8Rng::seed_from_u64(5);
    let mut rng_b = ChaCha8Rng::seed_from_u64(6);
    let mut a = Dungeon::new(config.width, config.height);
    let mut b = Dungeon::new(config.width, config.height);

    a.carve_rooms(&mut rng_a, config.room_min, config.room_max, config.room_attempts);
    b.carve_rooms(&mut rng_b, config.room_min, config.room_max, config.room_attempts);
    a.add_maze(&mut rng_a);
    b.add_maze(&mut rng_b);
    a.add_connectors();
    b.add_connectors();
    a.connect_rooms(&mut rng_a, config.connector_survival_chance).expect("run a connects");
    b.connect_rooms(&mut rng_b, config.connector_survival_chance).expect("run b connects");
    a.connect_loose_connectors();
    b.connect_loose_connectors();
    a.seal_unused_corridors();
    b.seal_unused_corridors();

    assert_eq!(a.canonical_bytes(), expected_a.canonical_bytes());
    assert_eq!(b.canonical_bytes(), expected_b.canonical_bytes());
}

#[test]
fn test_determinism_sealing_only_removes_maze_corridors() {
    let sealed = GenerationConfig::default();
    let unsealed = GenerationConfig { seal_unused: false, ..GenerationConfig::default() };

    let with_seal = generate(9, &sealed).expect("default config should generate");
    let without_seal = generate(9, &unsealed).expect("default config should generate");

    // Same seed, same pipeline up to sealing; the unsealed run keeps its maze.
    assert_eq!(with_seal.tiles_by_type(TileKind::CorridorMaze).count(), 0);
    assert!(without_seal.tiles_by_type(TileKind::CorridorMaze).count() > 0);
    assert_eq!(
        with_seal.tiles_by_type(TileKind::Floor).count(),
        without_seal.tiles_by_type(TileKind::Floor).count()
    );
    assert_eq!(
        with_seal.tiles_by_type(TileKind::CorridorPath).count(),
        without_seal.tiles_by_type(TileKind::CorridorPath).count()
    );
}
