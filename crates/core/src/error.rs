//! Error types for the comfort-field core.

use thiserror::Error;

/// Errors produced while building or driving an engine.
///
/// The per-frame numerics never fail; these cover construction, lookup of
/// names supplied by the caller, and snapshot I/O.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero (or overflowed) when creating a field or playfield.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A continuous playfield extent was not a finite positive number.
    #[error("invalid playfield extent: {width} x {height}")]
    InvalidExtent { width: f64, height: f64 },

    /// Two grids had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// The engine registry has no engine by this name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// A weather mode name or key did not match any mode.
    #[error("unknown weather mode: {0}")]
    UnknownWeather(String),

    /// An engine parameter was outside its published range.
    #[error("invalid parameter {name}: {value} not in [{min}, {max}]")]
    InvalidParam {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}
