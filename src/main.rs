use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use skeleton_assembly::engine::assets::AssetManager;
use skeleton_assembly::engine::game_loop::GameLoop;
use skeleton_assembly::game::assembly::{AssemblyConfig, PartLibrary, SlotKind};
use skeleton_assembly::game::playground::Playground;

/// Overrides the bundled asset directory
const ASSETS_ENV: &str = "SKELETON_ASSETS";
const CONFIG_NAME: &str = "assembly.toml";

/// Order the demo drops parts in, by part id
const DROP_ORDER: [&str; 5] = ["bone_torso", "bone_leg", "bone_leg", "bone_arm", "bone_arm"];

/// Simulated seconds per dropped part
const SECONDS_PER_DROP: u64 = 2;

fn asset_root() -> PathBuf {
    std::env::var_os(ASSETS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Skeleton Assembly...");

    let root = asset_root();
    info!("Loading assets from {}", root.display());

    let mut assets = AssetManager::new(&root);
    let config = AssemblyConfig::load(assets.loader(), CONFIG_NAME)?;
    let library = PartLibrary::load_all(&mut assets)?;
    let stats = assets.stats();
    info!(
        "Assets ready: {} prefabs, {} sound sets",
        stats.prefab_count, stats.sound_set_count
    );

    let mut playground = Playground::new(&config, 7);
    let mut game_loop = GameLoop::new();
    let frame = Duration::from_secs_f32(game_loop.fixed_timestep());
    let frames_per_drop = (SECONDS_PER_DROP as f32 / game_loop.fixed_timestep()) as u32;

    // Drop each part right above the skeleton so it lands in the sensor
    for id in DROP_ORDER {
        let part = library
            .get(id)
            .with_context(|| format!("Part '{}' is not in the library", id))?;
        playground.spawn_pickup(part, 0.0, 1.5);

        for _ in 0..frames_per_drop {
            for _ in 0..game_loop.advance(frame) {
                playground.step(game_loop.fixed_timestep());
            }
        }

        let assembly = playground.character().assembly();
        let legs = if assembly.leg_collider_enabled() {
            "on"
        } else {
            "off"
        };
        info!(
            "After '{}': {} (leg collider {})",
            id,
            assembly.current(),
            legs
        );
    }

    let assembly = playground.character().assembly();
    let occupied: Vec<String> = SlotKind::ALL
        .into_iter()
        .filter(|kind| assembly.registry().is_occupied(*kind))
        .map(|kind| kind.to_string())
        .collect();

    info!(
        "Finished after {:.1}s: collected {} parts, slots [{}], {} pickups left",
        game_loop.elapsed().as_secs_f32(),
        playground.collected(),
        occupied.join(", "),
        playground.pickup_count()
    );

    Ok(())
}
