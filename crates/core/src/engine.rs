//! The `Engine` trait: one frame-stepped simulation behind a renderer-agnostic face.
//!
//! The trait is object-safe so a host can drive `dyn Engine` without knowing
//! which simulation it holds.

use crate::error::EngineError;
use crate::field::Field;
use glam::DVec2;
use serde_json::Value;

/// What a renderer needs to draw one agent: a dot and a polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    /// Current position in playfield units.
    pub position: DVec2,
    /// Recent positions, oldest first.
    pub trail: Vec<DVec2>,
}

/// A frame-stepped simulation.
///
/// Each [`step`](Engine::step) advances exactly one frame. Between frames
/// the host reads [`field`](Engine::field), the optional hue overlay and the
/// agents, and may forward key presses.
pub trait Engine {
    /// Advance the simulation by one frame.
    fn step(&mut self) -> Result<(), EngineError>;

    /// The primary scalar grid, values in [0, 1].
    fn field(&self) -> &Field;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing available parameters: type, range, default, description.
    fn param_schema(&self) -> Value;

    /// Optional per-cell hue, stored as `degrees / 360`.
    fn hue_field(&self) -> Option<&Field> {
        None
    }

    /// Agents to draw on top of the field. Empty by default.
    fn agents(&self) -> Vec<AgentView> {
        Vec::new()
    }

    /// Forwards a key press. Returns `true` if the engine acted on it.
    fn key_press(&mut self, _key: char) -> bool {
        false
    }

    /// Number of frames stepped so far.
    fn frame(&self) -> u64;
}
