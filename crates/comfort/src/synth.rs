//! Comfort field synthesis.
//!
//! Every frame each grid cell gets a comfort value blended from four inputs
//! sampled at the cell center:
//!
//! - `base`: structural noise, the static texture of the city
//! - `temp`: a vertical gradient, warmest (1) on the top row, coolest (0) on the bottom
//! - `rain`: a gaussian around a drifting rain cloud
//! - `eco`: proximity to the nearest point-of-interest
//!
//! The weather mode picks the weights. The same pass writes the hue overlay.

use crate::weather::{BlendWeights, WeatherState};
use comfort_field_core::color::comfort_hue;
use comfort_field_core::{EngineError, Field, NoiseSource, Playfield};
use glam::DVec2;

/// Scale applied to cell indices before sampling structural noise.
pub const DEFAULT_NOISE_SCALE: f64 = 0.08;
/// Rain cloud radius as a fraction of playfield width.
pub const RAIN_RADIUS_FRACTION: f64 = 0.45;
/// Distance, as a fraction of playfield width, at which proximity falls to zero.
pub const ECO_REACH_FRACTION: f64 = 0.4;

/// Angular speed of the cloud's horizontal drift, radians per frame.
const RAIN_DRIFT_X: f64 = 0.007;
/// Angular speed of the cloud's vertical drift, radians per frame.
const RAIN_DRIFT_Y: f64 = 0.004;
const RAIN_SWING_X: f64 = 0.3;
const RAIN_SWING_Y: f64 = 0.2;

/// Linear map of `v` from `[a0, a1]` onto `[b0, b1]`, unclamped.
pub fn map_range(v: f64, a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    b0 + (v - a0) / (a1 - a0) * (b1 - b0)
}

/// The four points-of-interest of the reference layout.
pub fn reference_pois(playfield: &Playfield) -> Vec<DVec2> {
    let (w, h) = (playfield.width(), playfield.height());
    vec![
        DVec2::new(w * 0.25, h * 0.30),
        DVec2::new(w * 0.70, h * 0.25),
        DVec2::new(w * 0.30, h * 0.75),
        DVec2::new(w * 0.75, h * 0.70),
    ]
}

/// Circular rain region for one frame. Derived from the frame counter, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainCloud {
    pub center: DVec2,
    pub radius: f64,
}

impl RainCloud {
    /// Cloud position at `frame`: a smooth Lissajous drift around the playfield center.
    pub fn at_frame(playfield: &Playfield, frame: u64) -> Self {
        let t = frame as f64;
        let center = DVec2::new(
            playfield.width() * (0.5 + RAIN_SWING_X * (RAIN_DRIFT_X * t).sin()),
            playfield.height() * (0.5 + RAIN_SWING_Y * (RAIN_DRIFT_Y * t).cos()),
        );
        Self {
            center,
            radius: playfield.width() * RAIN_RADIUS_FRACTION,
        }
    }

    /// `exp(-(d / r)^2)`: 1 at the center, approaching 0 far away.
    pub fn intensity(&self, p: DVec2) -> f64 {
        let d = p.distance(self.center) / self.radius;
        (-(d * d)).exp()
    }
}

/// The comfort grid and hue overlay for one frame.
///
/// Rewritten in full by [`FieldSynthesizer::synthesize`]; agents only ever
/// see it through a shared borrow.
#[derive(Debug, Clone)]
pub struct ComfortGrid {
    playfield: Playfield,
    comfort: Field,
    hue: Field,
}

impl ComfortGrid {
    /// A zeroed grid matching the playfield resolution.
    pub fn new(playfield: Playfield) -> Result<Self, EngineError> {
        Ok(Self {
            playfield,
            comfort: Field::new(playfield.cols(), playfield.rows())?,
            hue: Field::new(playfield.cols(), playfield.rows())?,
        })
    }

    /// Wraps an existing comfort field. The hue overlay is derived from it.
    pub fn from_field(playfield: Playfield, comfort: Field) -> Result<Self, EngineError> {
        if comfort.width() != playfield.cols() || comfort.height() != playfield.rows() {
            return Err(EngineError::DimensionMismatch {
                lhs_w: playfield.cols(),
                lhs_h: playfield.rows(),
                rhs_w: comfort.width(),
                rhs_h: comfort.height(),
            });
        }
        let hue = comfort
            .data()
            .iter()
            .map(|&c| comfort_hue(c) / 360.0)
            .collect();
        let hue = Field::from_data(comfort.width(), comfort.height(), hue)?;
        Ok(Self {
            playfield,
            comfort,
            hue,
        })
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn comfort(&self) -> &Field {
        &self.comfort
    }

    /// Hue per cell as `degrees / 360`.
    pub fn hue(&self) -> &Field {
        &self.hue
    }

    /// Comfort at a continuous position.
    ///
    /// Positions outside the playfield read exactly 0; inside, the position
    /// is floored to its cell.
    pub fn comfort_at(&self, p: DVec2) -> f64 {
        self.playfield
            .cell_of(p)
            .and_then(|(col, row)| self.comfort.get(col, row))
            .unwrap_or(0.0)
    }
}

/// Produces the comfort grid each frame.
pub struct FieldSynthesizer {
    playfield: Playfield,
    pois: Vec<DVec2>,
    noise: Box<dyn NoiseSource>,
    noise_scale: f64,
}

impl FieldSynthesizer {
    pub fn new(playfield: Playfield, pois: Vec<DVec2>, noise: Box<dyn NoiseSource>) -> Self {
        Self {
            playfield,
            pois,
            noise,
            noise_scale: DEFAULT_NOISE_SCALE,
        }
    }

    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn pois(&self) -> &[DVec2] {
        &self.pois
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    /// Structural noise for cell `(col, row)`.
    pub fn base_at(&self, col: usize, row: usize) -> f64 {
        self.noise.sample(
            col as f64 * self.noise_scale,
            row as f64 * self.noise_scale,
        )
    }

    /// Warmth of a row: 1 on the top row falling linearly to 0 on the bottom.
    ///
    /// A single-row grid is all top row.
    pub fn temp_at_row(&self, row: usize) -> f64 {
        let rows = self.playfield.rows();
        if rows <= 1 {
            return 1.0;
        }
        map_range(row as f64, 0.0, (rows - 1) as f64, 1.0, 0.0)
    }

    /// Proximity to the nearest point-of-interest, in [0, 1].
    ///
    /// 1 on top of a point, 0 at `0.4 * width` or farther, and 0 when there
    /// are no points at all.
    pub fn eco_at(&self, p: DVec2) -> f64 {
        let nearest = self
            .pois
            .iter()
            .map(|poi| poi.distance(p))
            .min_by(f64::total_cmp);
        match nearest {
            Some(d) => {
                let reach = self.playfield.width() * ECO_REACH_FRACTION;
                map_range(d, 0.0, reach, 1.0, 0.0).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    /// Comfort of a single cell, clamped to [0, 1].
    pub fn comfort_at_cell(
        &self,
        col: usize,
        row: usize,
        weights: &BlendWeights,
        rain: &RainCloud,
    ) -> f64 {
        let p = self.playfield.cell_center(col, row);
        let base = self.base_at(col, row);
        let temp = self.temp_at_row(row);
        let wet = rain.intensity(p);
        let eco = self.eco_at(p);
        weights.blend(temp, eco, wet, base).clamp(0.0, 1.0)
    }

    /// Rewrites every cell of `grid` (comfort and hue) for `frame`.
    ///
    /// Returns the rain cloud used, for renderers that want to outline it.
    pub fn synthesize(
        &self,
        weather: &WeatherState,
        frame: u64,
        grid: &mut ComfortGrid,
    ) -> RainCloud {
        let rain = RainCloud::at_frame(&self.playfield, frame);
        let weights = weather.mode().weights();
        let cols = self.playfield.cols();

        let ComfortGrid { comfort, hue, .. } = grid;
        for (idx, (c, h)) in comfort
            .data_mut()
            .iter_mut()
            .zip(hue.data_mut().iter_mut())
            .enumerate()
        {
            let value = self.comfort_at_cell(idx % cols, idx / cols, &weights, &rain);
            *c = value;
            *h = comfort_hue(value) / 360.0;
        }
        rain
    }
}
