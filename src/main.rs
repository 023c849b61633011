//! Farmstead Simulation Driver
//!
//! Headless driver for the simulation core. Plays a scripted morning on the
//! farm through the same key-to-action path a windowed host would use, then
//! replays the recording and checks that both runs hash identically.
//!
//! Usage: `farmstead-sim [config.json]`

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use farmstead::{
    game::{
        controls::{Controls, Key},
        events::SimEventData,
        item::{ItemCatalog, DEFAULT_ITEMS_JSON},
        replay::{replay, Recording},
    },
    Action, CollisionGeometry, Polygon, Rect, SimConfig, Simulation, TARGET_FPS, VERSION,
};

/// Scripted key transition.
#[derive(Clone, Copy, Debug)]
enum KeyEvent {
    Press(Key),
    Release(Key),
}

/// (frame, event) pairs, in frame order.
const SCRIPT: &[(u32, KeyEvent)] = &[
    // Walk right for half a second
    (1, KeyEvent::Press(Key::Right)),
    (61, KeyEvent::Release(Key::Right)),
    // Till the ground underfoot with the hoe (slot 0)
    (62, KeyEvent::Press(Key::UseItem)),
    (63, KeyEvent::Release(Key::UseItem)),
    // Switch to the seeds and plant
    (64, KeyEvent::Press(Key::Slot(1))),
    (65, KeyEvent::Release(Key::Slot(1))),
    (66, KeyEvent::Press(Key::UseItem)),
    (67, KeyEvent::Release(Key::UseItem)),
    // Sleep through four days
    (68, KeyEvent::Press(Key::NextDay)),
    (69, KeyEvent::Release(Key::NextDay)),
    (70, KeyEvent::Press(Key::NextDay)),
    (71, KeyEvent::Release(Key::NextDay)),
    (72, KeyEvent::Press(Key::NextDay)),
    (73, KeyEvent::Release(Key::NextDay)),
    (74, KeyEvent::Press(Key::NextDay)),
    (75, KeyEvent::Release(Key::NextDay)),
    // Back to the hoe and harvest
    (76, KeyEvent::Press(Key::Slot(0))),
    (77, KeyEvent::Release(Key::Slot(0))),
    (78, KeyEvent::Press(Key::UseItem)),
    (79, KeyEvent::Release(Key::UseItem)),
    // Wander up-left into the fence
    (80, KeyEvent::Press(Key::Up)),
    (80, KeyEvent::Press(Key::Left)),
    (200, KeyEvent::Release(Key::Up)),
    (200, KeyEvent::Release(Key::Left)),
];

const LAST_FRAME: u32 = 210;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Farmstead Sim v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config `{}`", path))?;
            SimConfig::from_json(&json).with_context(|| format!("invalid config `{}`", path))?
        }
        None => SimConfig::default(),
    };
    info!(
        "Speed: {} px/s, animation frame: {} ms, spawn: {}",
        config.character_speed,
        config.animation_interval_ns / 1_000_000,
        config.spawn
    );

    let catalog = Arc::new(
        ItemCatalog::from_json(DEFAULT_ITEMS_JSON).context("failed to load item catalog")?,
    );
    let geometry = Arc::new(farm_geometry());

    demo_session(config, geometry, catalog)
}

/// Fence along the farmhouse yard.
fn farm_geometry() -> CollisionGeometry {
    vec![
        Polygon::from_rect(Rect::new(240.0, 160.0, 160.0, 16.0)),
        Polygon::new(vec![
            farmstead::Vec2::new(200.0, 120.0),
            farmstead::Vec2::new(240.0, 120.0),
            farmstead::Vec2::new(240.0, 176.0),
        ]),
    ]
    .into_iter()
    .collect()
}

/// Run the scripted session, then verify it by replay.
fn demo_session(
    config: SimConfig,
    geometry: Arc<CollisionGeometry>,
    catalog: Arc<ItemCatalog>,
) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let hoe = catalog.find_by_name("Hoe").context("catalog has no hoe")?.id;
    let seeds = catalog
        .find_by_name("Parsnip Seeds")
        .context("catalog has no parsnip seeds")?
        .id;

    let mut sim = Simulation::new(config.clone(), geometry.clone(), catalog.clone())?;
    let mut controls = Controls::new();
    let mut recording = Recording::new(config);

    let elapsed_secs = 1.0 / TARGET_FPS as f32;
    let mut script = SCRIPT.iter().peekable();
    let mut running = true;
    let mut frame = 0;
    let mut total_events = 0;

    while running {
        while let Some((_, event)) = script.next_if(|(at, _)| *at == frame) {
            match *event {
                KeyEvent::Press(key) => controls.press(key),
                KeyEvent::Release(key) => controls.release(key),
            }
        }

        let mut actions = controls.frame_actions(&sim);
        if frame == 0 {
            actions.push(Action::add_item(hoe));
            actions.push(Action::add_item(seeds));
        }

        recording.record(elapsed_secs, &actions);
        sim.submit(actions);
        let result = sim.step(elapsed_secs)?;
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                SimEventData::CharacterMoved { .. } => {}
                SimEventData::CropHarvested { pos, crop } => {
                    info!("Step {}: harvested {} at {}", event.step, crop, pos);
                }
                SimEventData::ItemDropped { item } => {
                    warn!("Step {}: no room for {}", event.step, item);
                }
                other => debug!("Step {}: {:?}", event.step, other),
            }
        }

        frame += 1;
        if frame > LAST_FRAME {
            running = false;
        }
    }

    // Print final results
    info!("=== Session Results ===");
    let snapshot = sim.snapshot();
    info!(
        "Character at {} facing {:?}, day {}, coins {}",
        snapshot.character.position, snapshot.character.direction, snapshot.day, snapshot.coins
    );
    for (i, slot) in snapshot.hotbar.iter().enumerate() {
        if let Some(slot) = slot {
            let name = catalog.get(slot.item()).map_or("?", |item| item.name.as_str());
            info!("Slot {}: {} x{}", i, name, slot.count());
        }
    }
    let hash = snapshot.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);

    // Verify determinism by replaying
    info!("=== Verifying Replay ===");
    let json = recording.to_json()?;
    info!("Recording: {} frames, {} bytes", recording.len(), json.len());
    let restored = Recording::from_json(&json)?;
    let (replayed, _) = replay(&restored, geometry, catalog)?;
    let replay_hash = replayed.snapshot().compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("replay diverged from the live session");
    }
    info!("REPLAY VERIFIED: Hashes match!");
    Ok(())
}
