//! Simulation Step
//!
//! One call to [`Simulation::step`] advances the game by one frame:
//!
//! 1. Drain every pending action (follow-ups enqueued from here on wait
//!    for the next step).
//! 2. Advance the animation clock by the frame time.
//! 3. Apply all movement actions to the character, in order. With none,
//!    the character is Standing.
//! 4. Apply all other actions to the world, in order.
//!
//! Character updates always precede world updates within a step.

use std::sync::Arc;

use tracing::{debug, warn};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::SimConfig;
use crate::core::geometry::CollisionGeometry;
use crate::error::{SimError, SimResult};
use crate::game::action::Action;
use crate::game::character::{Character, MotionState};
use crate::game::events::SimEvent;
use crate::game::item::ItemCatalog;
use crate::game::movement::MovementResolver;
use crate::game::queue::ActionQueue;
use crate::game::snapshot::Snapshot;
use crate::game::world::WorldState;

/// Result of a step.
#[derive(Debug, Default)]
pub struct StepResult {
    /// Events generated this step, in application order
    pub events: Vec<SimEvent>,
    /// Number of actions drained and applied
    pub applied: usize,
    /// World actions that failed (off-grid targets, unknown items)
    pub rejected: Vec<Action>,
}

/// A running simulation session.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    character: Character,
    world: WorldState,
    queue: ActionQueue,
    resolver: MovementResolver,
    step: u64,
}

impl Simulation {
    /// Start a session with the character at `config.spawn`.
    pub fn new(
        config: SimConfig,
        geometry: Arc<CollisionGeometry>,
        catalog: Arc<ItemCatalog>,
    ) -> SimResult<Self> {
        if !config.character_speed.is_finite() || config.character_speed < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "character speed must be finite and non-negative (got {})",
                config.character_speed
            )));
        }

        let resolver = MovementResolver::new(geometry, config.character_speed, config.hitbox_size());
        debug!(
            "Simulation created: spawn {}, {} obstacles, {} items",
            config.spawn,
            resolver.geometry().len(),
            catalog.len()
        );

        Ok(Self {
            character: Character::new(config.spawn),
            world: WorldState::new(catalog),
            queue: ActionQueue::new(),
            resolver,
            step: 0,
            config,
        })
    }

    /// Queue an action for the next step.
    pub fn enqueue(&mut self, action: Action) {
        self.queue.enqueue(action);
    }

    /// Queue a frame's worth of actions, preserving order.
    pub fn submit<I: IntoIterator<Item = Action>>(&mut self, actions: I) {
        self.queue.extend(actions);
    }

    /// Advance one frame of `elapsed_secs`.
    ///
    /// Fails with `InvalidArgument` for a negative or non-finite frame time,
    /// in which case nothing is drained. Failing world actions are logged,
    /// collected in [`StepResult::rejected`] and skipped; the rest of the
    /// step still runs.
    pub fn step(&mut self, elapsed_secs: f32) -> SimResult<StepResult> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "elapsed time must be finite and non-negative (got {})",
                elapsed_secs
            )));
        }

        self.step += 1;
        let mut result = StepResult::default();

        // 1. Drain
        let actions = self.queue.drain_all();
        result.applied = actions.len();

        // 2. Animation clock
        let elapsed_ns = (elapsed_secs as f64 * 1e9) as u64;
        self.character
            .advance_animation(elapsed_ns, self.config.animation_interval_ns);

        // 3. Character
        self.update_character(&actions, elapsed_secs, &mut result);

        // 4. World
        for action in actions.iter().filter(|a| !a.is_movement()) {
            if let Err(e) = self.world.apply_action(self.step, action, &mut self.queue, &mut result.events) {
                warn!("Step {}: rejected {}: {}", self.step, action, e);
                result.rejected.push(action.clone());
            }
        }

        #[cfg(feature = "debug-tracing")]
        trace!(
            "Step {}: position {} {:?} {:?}",
            self.step,
            self.character.position,
            self.character.direction,
            self.character.motion
        );

        Ok(result)
    }

    fn update_character(&mut self, actions: &[Action], elapsed_secs: f32, result: &mut StepResult) {
        let from = self.character.position;
        let mut moved = false;

        for action in actions {
            if let Action::MoveCharacter(input) = action {
                self.resolver.apply(&mut self.character, *input, elapsed_secs);
                moved = true;
            }
        }

        if moved {
            result.events.push(SimEvent::character_moved(
                self.step,
                from,
                self.character.position,
                self.character.direction,
            ));
        } else {
            self.character.motion = MotionState::Standing;
        }
    }

    /// Read-only view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.step, &self.character, &self.world)
    }

    /// Steps completed.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// The character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// World state.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Mutable world state, for setup outside the action pipeline.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// Actions waiting for the next step.
    pub fn pending(&self) -> &ActionQueue {
        &self.queue
    }

    /// Session config.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

// =============================================================================
// TESTS
// =============================================================================
