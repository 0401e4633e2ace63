//! Agents that climb the comfort gradient.
//!
//! Each frame an agent probes the grid around itself, steers toward higher
//! comfort, moves, and respawns next to a point-of-interest if it has
//! wandered off the playfield or is standing somewhere unpleasant.

use crate::synth::ComfortGrid;
use crate::trail::Trail;
use comfort_field_core::{Playfield, Xorshift64};
use glam::DVec2;
use tracing::debug;

/// Tunables for the agent update rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    /// Probe offset for the central difference, playfield units.
    pub probe: f64,
    /// Gradient magnitude below which the field counts as flat.
    pub flat_threshold: f64,
    /// Half-extent of the random wander vector used on a flat field.
    pub wander: f64,
    /// Share of the previous velocity kept each frame.
    pub inertia: f64,
    /// Share of the unit gradient direction added each frame.
    pub steer: f64,
    pub max_speed: f64,
    /// Distance past any edge at which an agent is pulled back.
    pub margin: f64,
    /// Comfort below which an agent respawns.
    pub comfort_threshold: f64,
    /// Respawn distance range from the chosen point-of-interest.
    pub spawn_radius: (f64, f64),
    /// Half-extent of each respawn velocity component.
    pub spawn_speed: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            probe: 10.0,
            flat_threshold: 0.0005,
            wander: 0.5,
            inertia: 0.75,
            steer: 0.25,
            max_speed: 2.0,
            margin: 40.0,
            comfort_threshold: 0.18,
            spawn_radius: (10.0, 60.0),
            spawn_speed: 1.0,
        }
    }
}

/// Why an agent was sent back to a point-of-interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnReason {
    OutOfBounds,
    Uncomfortable,
}

/// Result of one [`GradientAgent::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStep {
    Moved,
    Respawned(RespawnReason),
}

/// Comfort at `p` and its central-difference gradient with probe offset `eps`.
///
/// `y` grows downward, so a positive `gradient.y` means comfort rises below.
pub fn sample_gradient(grid: &ComfortGrid, p: DVec2, eps: f64) -> (f64, DVec2) {
    let center = grid.comfort_at(p);
    let left = grid.comfort_at(p - DVec2::X * eps);
    let right = grid.comfort_at(p + DVec2::X * eps);
    let up = grid.comfort_at(p - DVec2::Y * eps);
    let down = grid.comfort_at(p + DVec2::Y * eps);
    let gradient = DVec2::new(right - left, down - up) / (2.0 * eps);
    (center, gradient)
}

/// Rescales `v` to exactly `max` when it is longer; leaves it alone otherwise.
pub fn clamp_speed(v: DVec2, max: f64) -> DVec2 {
    if v.length() > max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// A single gradient-following agent.
#[derive(Debug, Clone)]
pub struct GradientAgent {
    position: DVec2,
    velocity: DVec2,
    trail: Trail,
    comfort: f64,
    gradient: DVec2,
}

impl GradientAgent {
    /// An agent at `position` with the given velocity and an empty trail.
    pub fn at(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity,
            trail: Trail::default(),
            comfort: 0.0,
            gradient: DVec2::ZERO,
        }
    }

    /// A freshly spawned agent next to a random point-of-interest.
    pub fn spawn(
        pois: &[DVec2],
        playfield: &Playfield,
        config: &AgentConfig,
        rng: &mut Xorshift64,
    ) -> Self {
        let mut agent = Self::at(DVec2::ZERO, DVec2::ZERO);
        agent.respawn(pois, playfield, config, rng);
        agent
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Comfort sampled at the agent's center during the last update.
    pub fn comfort(&self) -> f64 {
        self.comfort
    }

    /// Gradient estimated during the last update, before any flat-field substitution.
    pub fn gradient(&self) -> DVec2 {
        self.gradient
    }

    /// Resets the agent in place next to a uniformly chosen point-of-interest.
    ///
    /// The offset has a uniform angle and a radius in `config.spawn_radius`.
    /// With no points the playfield center stands in.
    pub fn respawn(
        &mut self,
        pois: &[DVec2],
        playfield: &Playfield,
        config: &AgentConfig,
        rng: &mut Xorshift64,
    ) {
        let anchor = if pois.is_empty() {
            playfield.center()
        } else {
            pois[rng.next_usize(pois.len())]
        };
        let angle = rng.next_angle();
        let (r_min, r_max) = config.spawn_radius;
        let radius = rng.next_range(r_min, r_max);
        self.position = anchor + DVec2::from_angle(angle) * radius;
        self.velocity = rng.next_box(config.spawn_speed);
        self.trail.clear();
        self.comfort = 0.0;
        self.gradient = DVec2::ZERO;
    }

    /// Advances the agent one frame against this frame's grid.
    pub fn update(
        &mut self,
        grid: &ComfortGrid,
        pois: &[DVec2],
        config: &AgentConfig,
        rng: &mut Xorshift64,
    ) -> AgentStep {
        let (comfort, gradient) = sample_gradient(grid, self.position, config.probe);
        self.comfort = comfort;
        self.gradient = gradient;

        let heading = if gradient.length() < config.flat_threshold {
            rng.next_box(config.wander)
        } else {
            gradient
        };
        let direction = heading.normalize_or_zero();

        self.velocity = clamp_speed(
            self.velocity * config.inertia + direction * config.steer,
            config.max_speed,
        );
        self.position += self.velocity;
        self.trail.push(self.position);

        let reason = if grid.playfield().beyond_margin(self.position, config.margin) {
            Some(RespawnReason::OutOfBounds)
        } else if comfort < config.comfort_threshold {
            Some(RespawnReason::Uncomfortable)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!(
                    ?reason,
                    x = self.position.x,
                    y = self.position.y,
                    comfort,
                    "agent respawning"
                );
                self.respawn(pois, grid.playfield(), config, rng);
                AgentStep::Respawned(reason)
            }
            None => AgentStep::Moved,
        }
    }
}
