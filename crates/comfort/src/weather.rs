//! Weather modes and the blend weights they select.

use comfort_field_core::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete weather scenario. Selects how the comfort inputs are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMode {
    #[default]
    Sunny,
    Rain,
    Heat,
}

/// Weights for the four comfort terms. Each set sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    /// Applied to `1 - temp` (coolness).
    pub cool: f64,
    /// Applied to point-of-interest proximity.
    pub eco: f64,
    /// Applied to `1 - rain` (dryness).
    pub dry: f64,
    /// Applied to structural noise.
    pub base: f64,
}

impl BlendWeights {
    pub fn sum(&self) -> f64 {
        self.cool + self.eco + self.dry + self.base
    }

    pub fn blend(&self, temp: f64, eco: f64, rain: f64, base: f64) -> f64 {
        self.cool * (1.0 - temp) + self.eco * eco + self.dry * (1.0 - rain) + self.base * base
    }
}

impl WeatherMode {
    pub const ALL: [WeatherMode; 3] = [WeatherMode::Sunny, WeatherMode::Rain, WeatherMode::Heat];

    pub fn weights(self) -> BlendWeights {
        match self {
            WeatherMode::Sunny => BlendWeights {
                cool: 0.35,
                eco: 0.35,
                dry: 0.20,
                base: 0.10,
            },
            WeatherMode::Rain => BlendWeights {
                cool: 0.15,
                eco: 0.45,
                dry: 0.30,
                base: 0.10,
            },
            WeatherMode::Heat => BlendWeights {
                cool: 0.55,
                eco: 0.20,
                dry: 0.15,
                base: 0.10,
            },
        }
    }

    /// Mode bound to a number key: `1` sunny, `2` rain, `3` heat.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(WeatherMode::Sunny),
            '2' => Some(WeatherMode::Rain),
            '3' => Some(WeatherMode::Heat),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            WeatherMode::Sunny => '1',
            WeatherMode::Rain => '2',
            WeatherMode::Heat => '3',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherMode::Sunny => "sunny",
            WeatherMode::Rain => "rain",
            WeatherMode::Heat => "heat",
        }
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeatherMode {
    type Err = EngineError;

    /// Accepts the mode name (any case) or its key digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        WeatherMode::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .or_else(|| {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => WeatherMode::from_key(c),
                    _ => None,
                }
            })
            .ok_or_else(|| EngineError::UnknownWeather(s.to_string()))
    }
}

/// The weather the synthesizer reads each frame.
///
/// Owned by the simulation and handed to synthesis by reference; only key
/// input changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeatherState {
    mode: WeatherMode,
}

impl WeatherState {
    pub fn new(mode: WeatherMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WeatherMode {
        self.mode
    }

    /// Applies a key press. Returns the new mode if the key selects one.
    pub fn apply_key(&mut self, key: char) -> Option<WeatherMode> {
        let mode = WeatherMode::from_key(key)?;
        self.mode = mode;
        Some(mode)
    }
}
