//! Structural noise: a deterministic, smooth scalar function of 2D coordinates.
//!
//! The comfort blend uses noise as static "city fabric" texture. Sources are
//! pluggable so tests can pin the texture to a constant.

use noise::{NoiseFn, Perlin};

/// A deterministic scalar source over the plane, returning values in [0, 1].
///
/// Same coordinates must always give the same value.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Octave-summed Perlin noise remapped from [-1, 1] to [0, 1].
///
/// Each octave doubles the frequency and multiplies the amplitude by
/// `persistence`; the sum is normalized by the total amplitude.
pub struct PerlinNoise {
    noise: Perlin,
    octaves: u32,
    persistence: f64,
}

impl PerlinNoise {
    pub const DEFAULT_OCTAVES: u32 = 4;
    pub const DEFAULT_PERSISTENCE: f64 = 0.5;

    /// Four octaves with 0.5 falloff.
    pub fn new(seed: u32) -> Self {
        Self::with_octaves(seed, Self::DEFAULT_OCTAVES, Self::DEFAULT_PERSISTENCE)
    }

    /// `octaves` is raised to at least 1.
    pub fn with_octaves(seed: u32, octaves: u32, persistence: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            octaves: octaves.max(1),
            persistence,
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let (sum, norm, _, _) =
            (0..self.octaves).fold((0.0, 0.0, 1.0, 1.0), |(sum, norm, amp, freq), _| {
                (
                    sum + self.noise.get([x * freq, y * freq]) * amp,
                    norm + amp,
                    amp * self.persistence,
                    freq * 2.0,
                )
            });
        if norm.abs() < f64::EPSILON {
            return 0.5;
        }
        (0.5 + 0.5 * sum / norm).clamp(0.0, 1.0)
    }
}

/// The same value everywhere, clamped to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}
