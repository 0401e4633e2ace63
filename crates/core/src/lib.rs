#![deny(unsafe_code)]
//! Core types and traits for the comfort-field simulation.
//!
//! Provides the `Engine` trait, the `Field` grid type, `Playfield` geometry,
//! the `Xorshift64` PRNG, structural noise sources, HSB/sRGB color helpers,
//! and JSON parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod field;
pub mod noise_source;
pub mod params;
pub mod playfield;
pub mod prng;

pub use color::{Hsb, Srgb};
pub use engine::{AgentView, Engine};
pub use error::EngineError;
pub use field::Field;
pub use noise_source::{ConstantNoise, NoiseSource, PerlinNoise};
pub use playfield::Playfield;
pub use prng::Xorshift64;
