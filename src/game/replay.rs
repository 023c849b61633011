//! Session Recording and Replay
//!
//! A recording is the frame time and submitted actions of every step. Given
//! the same geometry and catalog, running a fresh simulation over it
//! reproduces the session exactly, which the snapshot hash can confirm.

use std::sync::Arc;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::SimConfig;
use crate::core::geometry::CollisionGeometry;
use crate::error::SimResult;
use crate::game::action::Action;
use crate::game::events::SimEvent;
use crate::game::item::ItemCatalog;
use crate::game::step::Simulation;

/// Input for one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Frame time passed to the step
    pub elapsed_secs: f32,
    /// Actions submitted before the step, in order
    pub actions: Vec<Action>,
}

/// Recorded session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Config the session started with
    pub config: SimConfig,
    frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Empty recording for a session using `config`.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            frames: Vec::with_capacity(1024),
        }
    }

    /// Record the input of one step.
    pub fn record(&mut self, elapsed_secs: f32, actions: &[Action]) {
        self.frames.push(RecordedFrame {
            elapsed_secs,
            actions: actions.to_vec(),
        });
    }

    /// Recorded frames, in step order.
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON recording. Actions are re-validated while parsing.
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Replay a recording on a fresh simulation.
///
/// Returns the final simulation and every event produced.
pub fn replay(
    recording: &Recording,
    geometry: Arc<CollisionGeometry>,
    catalog: Arc<ItemCatalog>,
) -> SimResult<(Simulation, Vec<SimEvent>)> {
    let mut sim = Simulation::new(recording.config.clone(), geometry, catalog)?;
    let mut all_events = Vec::new();

    for frame in &recording.frames {
        sim.submit(frame.actions.iter().cloned());
        let result = sim.step(frame.elapsed_secs)?;
        all_events.extend(result.events);
    }

    debug!("Replayed {} steps", recording.len());
    Ok((sim, all_events))
}
