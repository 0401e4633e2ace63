#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides CPU-side
//! frame rendering.
//!
//! Sits between `comfort-field-core` (the `Engine` trait) and the simulation
//! crates, so the CLI dispatches by name without knowing concrete types.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use comfort_field_core::{AgentView, Engine, EngineError, Field};
use comfort_field_sim::ComfortSim;
use serde_json::Value;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["comfort"];

/// Enumeration of all available engines.
///
/// Use [`EngineKind::from_name`] for string-based construction.
pub enum EngineKind {
    /// Comfort field with gradient-following agents.
    Comfort(ComfortSim),
}

impl EngineKind {
    /// Constructs an engine by name over a `width x height` canvas.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "comfort" => Ok(EngineKind::Comfort(ComfortSim::from_json(
                width as f64,
                height as f64,
                seed,
                params,
            )?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }
}

impl Engine for EngineKind {
    fn step(&mut self) -> Result<(), EngineError> {
        match self {
            EngineKind::Comfort(e) => e.step(),
        }
    }

    fn field(&self) -> &Field {
        match self {
            EngineKind::Comfort(e) => e.field(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Comfort(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Comfort(e) => e.param_schema(),
        }
    }

    fn hue_field(&self) -> Option<&Field> {
        match self {
            EngineKind::Comfort(e) => e.hue_field(),
        }
    }

    fn agents(&self) -> Vec<AgentView> {
        match self {
            EngineKind::Comfort(e) => e.agents(),
        }
    }

    fn key_press(&mut self, key: char) -> bool {
        match self {
            EngineKind::Comfort(e) => e.key_press(key),
        }
    }

    fn frame(&self) -> u64 {
        match self {
            EngineKind::Comfort(e) => e.frame(),
        }
    }
}
