#![deny(unsafe_code)]
//! Comfort field engine.
//!
//! Synthesizes a per-frame "comfort" grid from a vertical temperature
//! gradient, a drifting rain cloud, proximity to points-of-interest and a
//! static noise texture, then lets a handful of agents climb its gradient.
//!
//! One [`Engine::step`] is one frame: the synthesizer rewrites the whole
//! grid, then every agent reads that grid and moves. The weather mode is
//! owned by the engine and only changes through [`Engine::key_press`].

pub mod agent;
pub mod synth;
pub mod trail;
pub mod weather;

use agent::{AgentConfig, AgentStep, GradientAgent};
use comfort_field_core::params::{param_f64, param_string, param_usize};
use comfort_field_core::{
    AgentView, Engine, EngineError, Field, NoiseSource, PerlinNoise, Playfield, Xorshift64,
};
use glam::DVec2;
use serde_json::{json, Value};
use synth::{reference_pois, ComfortGrid, FieldSynthesizer, DEFAULT_NOISE_SCALE};
use tracing::{debug, trace};
use weather::{WeatherMode, WeatherState};

/// Default edge length of one grid cell, playfield units.
const DEFAULT_CELL_SIZE: f64 = 10.0;
/// Default number of agents.
const DEFAULT_AGENT_COUNT: usize = 12;

const CELL_SIZE_RANGE: (f64, f64) = (1.0, 100.0);
const AGENT_COUNT_RANGE: (usize, usize) = (0, 500);
const NOISE_SCALE_RANGE: (f64, f64) = (0.0, 1.0);
const COMFORT_THRESHOLD_RANGE: (f64, f64) = (0.0, 1.0);
const MAX_SPEED_RANGE: (f64, f64) = (0.0, 10.0);

fn check_range(name: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), EngineError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidParam {
            name,
            value,
            min,
            max,
        })
    }
}

/// Tunable parameters for [`ComfortSim`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortParams {
    /// Edge length of a grid cell; sets the grid resolution.
    pub cell_size: f64,
    pub agent_count: usize,
    /// Weather at the first frame.
    pub weather: WeatherMode,
    /// Scale applied to cell indices before sampling noise.
    pub noise_scale: f64,
    /// Comfort below which an agent respawns.
    pub comfort_threshold: f64,
    /// Agent speed cap.
    pub max_speed: f64,
}

impl Default for ComfortParams {
    fn default() -> Self {
        let agent = AgentConfig::default();
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            agent_count: DEFAULT_AGENT_COUNT,
            weather: WeatherMode::default(),
            noise_scale: DEFAULT_NOISE_SCALE,
            comfort_threshold: agent.comfort_threshold,
            max_speed: agent.max_speed,
        }
    }
}

impl ComfortParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Returns `EngineError::UnknownWeather` if `weather` names no mode, or
    /// `EngineError::InvalidParam` if a value is outside its schema range.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let d = Self::default();
        let parsed = Self {
            cell_size: param_f64(params, "cell_size", d.cell_size),
            agent_count: param_usize(params, "agent_count", d.agent_count),
            weather: param_string(params, "weather", d.weather.name()).parse()?,
            noise_scale: param_f64(params, "noise_scale", d.noise_scale),
            comfort_threshold: param_f64(params, "comfort_threshold", d.comfort_threshold),
            max_speed: param_f64(params, "max_speed", d.max_speed),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks every numeric parameter against the range `param_schema` publishes.
    pub fn validate(&self) -> Result<(), EngineError> {
        let (lo, hi) = AGENT_COUNT_RANGE;
        check_range("cell_size", self.cell_size, CELL_SIZE_RANGE)?;
        check_range("agent_count", self.agent_count as f64, (lo as f64, hi as f64))?;
        check_range("noise_scale", self.noise_scale, NOISE_SCALE_RANGE)?;
        check_range("comfort_threshold", self.comfort_threshold, COMFORT_THRESHOLD_RANGE)?;
        check_range("max_speed", self.max_speed, MAX_SPEED_RANGE)
    }

    fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            comfort_threshold: self.comfort_threshold,
            max_speed: self.max_speed,
            ..AgentConfig::default()
        }
    }
}

/// The comfort field simulation: synthesizer, weather, grid and agents.
pub struct ComfortSim {
    synth: FieldSynthesizer,
    grid: ComfortGrid,
    weather: WeatherState,
    agents: Vec<GradientAgent>,
    agent_config: AgentConfig,
    params: ComfortParams,
    rng: Xorshift64,
    frame: u64,
    respawns: u64,
}

impl ComfortSim {
    /// Creates a simulation over a `width x height` playfield with the
    /// reference points-of-interest and Perlin texture seeded from `seed`.
    pub fn new(
        width: f64,
        height: f64,
        seed: u64,
        params: ComfortParams,
    ) -> Result<Self, EngineError> {
        let playfield = Playfield::with_cell_size(width, height, params.cell_size)?;
        let pois = reference_pois(&playfield);
        // Fold the seed so both halves influence the texture.
        let noise_seed = (seed ^ (seed >> 32)) as u32;
        Self::with_parts(
            playfield,
            pois,
            Box::new(PerlinNoise::new(noise_seed)),
            seed,
            params,
        )
    }

    /// Creates a simulation from a JSON params object.
    pub fn from_json(
        width: f64,
        height: f64,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, ComfortParams::from_json(json_params)?)
    }

    /// Creates a simulation from explicit parts. `params.cell_size` is
    /// validated but otherwise ignored in favor of the playfield's own
    /// resolution.
    pub fn with_parts(
        playfield: Playfield,
        pois: Vec<DVec2>,
        noise: Box<dyn NoiseSource>,
        seed: u64,
        params: ComfortParams,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let synth =
            FieldSynthesizer::new(playfield, pois, noise).with_noise_scale(params.noise_scale);
        let grid = ComfortGrid::new(playfield)?;
        let agent_config = params.agent_config();
        let mut rng = Xorshift64::new(seed);
        let agents = (0..params.agent_count)
            .map(|_| GradientAgent::spawn(synth.pois(), &playfield, &agent_config, &mut rng))
            .collect();
        debug!(
            cols = playfield.cols(),
            rows = playfield.rows(),
            agents = params.agent_count,
            weather = %params.weather,
            "comfort simulation created"
        );
        Ok(Self {
            synth,
            grid,
            weather: WeatherState::new(params.weather),
            agents,
            agent_config,
            params,
            rng,
            frame: 0,
            respawns: 0,
        })
    }

    pub fn playfield(&self) -> &Playfield {
        self.grid.playfield()
    }

    /// The grid produced by the most recent frame.
    pub fn grid(&self) -> &ComfortGrid {
        &self.grid
    }

    pub fn weather(&self) -> WeatherMode {
        self.weather.mode()
    }

    pub fn agent_list(&self) -> &[GradientAgent] {
        &self.agents
    }

    pub fn pois(&self) -> &[DVec2] {
        self.synth.pois()
    }

    /// Total agent respawns since construction (initial spawns excluded).
    pub fn respawns(&self) -> u64 {
        self.respawns
    }
}

impl Engine for ComfortSim {
    fn step(&mut self) -> Result<(), EngineError> {
        let rain = self.synth.synthesize(&self.weather, self.frame, &mut self.grid);

        let pois = self.synth.pois();
        let mut respawned = 0;
        for agent in &mut self.agents {
            let outcome = agent.update(&self.grid, pois, &self.agent_config, &mut self.rng);
            if matches!(outcome, AgentStep::Respawned(_)) {
                respawned += 1;
            }
        }
        self.respawns += respawned;

        trace!(
            frame = self.frame,
            weather = %self.weather.mode(),
            rain_x = rain.center.x,
            rain_y = rain.center.y,
            respawned,
            "frame stepped"
        );
        self.frame += 1;
        Ok(())
    }

    fn field(&self) -> &Field {
        self.grid.comfort()
    }

    fn params(&self) -> Value {
        json!({
            "cell_size": self.params.cell_size,
            "agent_count": self.params.agent_count,
            "weather": self.weather.mode(),
            "noise_scale": self.params.noise_scale,
            "comfort_threshold": self.params.comfort_threshold,
            "max_speed": self.params.max_speed,
        })
    }

    fn param_schema(&self) -> Value {
        let d = ComfortParams::default();
        json!({
            "cell_size": {
                "type": "number",
                "default": d.cell_size,
                "min": CELL_SIZE_RANGE.0,
                "max": CELL_SIZE_RANGE.1,
                "description": "Edge length of one grid cell in playfield units"
            },
            "agent_count": {
                "type": "integer",
                "default": d.agent_count,
                "min": AGENT_COUNT_RANGE.0,
                "max": AGENT_COUNT_RANGE.1,
                "description": "Number of gradient-following agents"
            },
            "weather": {
                "type": "string",
                "default": d.weather.name(),
                "enum": WeatherMode::ALL.map(WeatherMode::name),
                "description": "Initial weather mode (keys 1, 2, 3 switch while running)"
            },
            "noise_scale": {
                "type": "number",
                "default": d.noise_scale,
                "min": NOISE_SCALE_RANGE.0,
                "max": NOISE_SCALE_RANGE.1,
                "description": "Scale applied to cell indices before sampling the noise texture"
            },
            "comfort_threshold": {
                "type": "number",
                "default": d.comfort_threshold,
                "min": COMFORT_THRESHOLD_RANGE.0,
                "max": COMFORT_THRESHOLD_RANGE.1,
                "description": "Comfort below which an agent respawns"
            },
            "max_speed": {
                "type": "number",
                "default": d.max_speed,
                "min": MAX_SPEED_RANGE.0,
                "max": MAX_SPEED_RANGE.1,
                "description": "Agent speed cap in playfield units per frame"
            }
        })
    }

    fn hue_field(&self) -> Option<&Field> {
        Some(self.grid.hue())
    }

    fn agents(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .map(|a| AgentView {
                position: a.position(),
                trail: a.trail().iter().collect(),
            })
            .collect()
    }

    fn key_press(&mut self, key: char) -> bool {
        let before = self.weather.mode();
        match self.weather.apply_key(key) {
            Some(mode) => {
                if mode != before {
                    debug!(from = %before, to = %mode, frame = self.frame, "weather changed");
                }
                true
            }
            None => false,
        }
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}
