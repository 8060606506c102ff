use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// ARENA
// ============================================================================

/// Arena width in world units
pub const ARENA_WIDTH: f32 = 1280.0;

/// Arena height in world units
pub const ARENA_HEIGHT: f32 = 720.0;

/// Margin from each arena edge inside which the wall force is active
pub const WALL_MARGIN: f32 = 5.0;

/// Magnitude of the inward wall force
pub const WALL_FORCE: f32 = 2.0;

// ============================================================================
// MOVEMENT
// ============================================================================

/// Velocity magnitude cap applied after integration
pub const MAX_SPEED: f32 = 3.0;

// ============================================================================
// HUNGER
// ============================================================================

/// Hunger gained per tick
pub const HUNGER_RATE: f32 = 0.1;

/// Hunger level above which an agent abandons the flock and seeks prey
pub const HUNGER_THRESHOLD: f32 = 60.0;

/// Hunger ceiling
pub const HUNGER_MAX: f32 = 100.0;

/// Hunger removed by a successful consumption
pub const EAT_RELIEF: f32 = 100.0;

/// Distance at which a locked target is consumed
pub const EAT_DISTANCE: f32 = 25.0;

// ============================================================================
// FLOCKING
// ============================================================================

/// Neighbor radius for cohesion and alignment
pub const FLOCK_RADIUS: f32 = 100.0;

/// Neighbor radius for separation
pub const SEPARATION_RADIUS: f32 = 35.0;

pub const COHESION_GAIN: f32 = 0.01;
pub const ALIGNMENT_GAIN: f32 = 0.1;
pub const SEPARATION_GAIN: f32 = 0.05;

// ============================================================================
// SEEKING & FLEEING
// ============================================================================

/// Radius within which a human notices and flees the nearest agent
pub const FLEE_RADIUS: f32 = 300.0;

pub const FLEE_GAIN: f32 = 0.1;
pub const SEEK_GAIN: f32 = 0.1;

// ============================================================================
// SPAWNING
// ============================================================================

/// Number of humans seeded at startup
pub const INITIAL_HUMAN_COUNT: usize = 100;

/// Side length of the square probe used to validate spawn positions against
/// obstacles
pub const SPAWN_PROBE_SIZE: f32 = 16.0;

/// A spawn click produces between SPAWN_BURST_MIN and SPAWN_BURST_MAX agents
pub const SPAWN_BURST_MIN: u32 = 1;
pub const SPAWN_BURST_MAX: u32 = 3;

/// What happens to a moving entity that leaves the arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Walls push inward near the edges; positions may overshoot slightly
    #[default]
    Bounce,
    /// Positions wrap modulo the arena size; no wall force
    Wrap,
}

/// One entry of a distance-tiered gain table. Entries are kept in descending
/// `min_dist` order and the first entry with `min_dist <= distance` wins.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct GainTier {
    pub min_dist: f32,
    pub gain: f32,
}

/// All simulation tunables, read once at startup and immutable afterwards.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub boundary_policy: BoundaryPolicy,
    pub wall_margin: f32,
    pub wall_force: f32,

    pub max_speed: f32,
    /// Per-force magnitude cap applied before accumulation; `None` leaves
    /// forces unclamped
    pub max_force: Option<f32>,

    pub hunger_rate: f32,
    pub hunger_threshold: f32,
    pub eat_distance: f32,

    pub cohesion_gain: f32,
    pub alignment_gain: f32,
    pub separation_gain: f32,
    pub flock_radius: f32,
    pub separation_radius: f32,

    /// Seek gain by distance to target, descending `min_dist`, first match wins
    pub seek_gains: Vec<GainTier>,
    /// Flee gain by distance to the pursuer, same tier rules as `seek_gains`
    pub flee_gains: Vec<GainTier>,
    pub flee_radius: f32,

    /// Population ceilings; `None` means unbounded
    pub max_agents: Option<usize>,
    pub max_prey: Option<usize>,

    pub initial_agents: usize,
    pub initial_humans: usize,
    pub spawn_probe_size: f32,
    pub spawn_burst: (u32, u32),
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            boundary_policy: BoundaryPolicy::Bounce,
            wall_margin: WALL_MARGIN,
            wall_force: WALL_FORCE,
            max_speed: MAX_SPEED,
            max_force: None,
            hunger_rate: HUNGER_RATE,
            hunger_threshold: HUNGER_THRESHOLD,
            eat_distance: EAT_DISTANCE,
            cohesion_gain: COHESION_GAIN,
            alignment_gain: ALIGNMENT_GAIN,
            separation_gain: SEPARATION_GAIN,
            flock_radius: FLOCK_RADIUS,
            separation_radius: SEPARATION_RADIUS,
            seek_gains: vec![GainTier {
                min_dist: 0.0,
                gain: SEEK_GAIN,
            }],
            flee_gains: vec![GainTier {
                min_dist: 0.0,
                gain: FLEE_GAIN,
            }],
            flee_radius: FLEE_RADIUS,
            max_agents: None,
            max_prey: None,
            initial_agents: 0,
            initial_humans: INITIAL_HUMAN_COUNT,
            spawn_probe_size: SPAWN_PROBE_SIZE,
            spawn_burst: (SPAWN_BURST_MIN, SPAWN_BURST_MAX),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimConfig {
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = SimConfig::default();
        assert_eq!(config.max_speed, 3.0);
        assert_eq!(config.hunger_threshold, 60.0);
        assert_eq!(config.eat_distance, 25.0);
        assert_eq!(config.boundary_policy, BoundaryPolicy::Bounce);
        assert!(config.max_agents.is_none());
    }

    #[test]
    fn parses_partial_overrides() {
        let config =
            SimConfig::from_json_str(r#"{ "max_speed": 5.0, "boundary_policy": "wrap" }"#)
                .unwrap();
        assert_eq!(config.max_speed, 5.0);
        assert_eq!(config.boundary_policy, BoundaryPolicy::Wrap);
        // untouched fields keep their defaults
        assert_eq!(config.flock_radius, FLOCK_RADIUS);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(SimConfig::from_json_str("{ not json").is_err());
    }
}
