//! Flocking predator/prey simulation engine.
//!
//! Agents flock while fed and hunt humans or dropped food once hunger passes
//! a threshold; a consumed human is replaced by a fresh agent on the spot.
//! Each Update pass is one simulation tick: behavior systems read a
//! start-of-tick snapshot and only write force accumulators and events, and
//! every population mutation is applied at the end of the tick through
//! `Commands`, so nothing spawned during a tick is processed within it.

pub mod agent;
pub mod config;
pub mod food;
pub mod human;
pub mod map;
pub mod motion;
pub mod population;
pub mod steering;

use bevy::prelude::*;

/// Resource to control simulation state
#[derive(Resource, PartialEq, Eq, Clone, Copy)]
pub enum SimulationState {
    Running,
    Paused,
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::Running
    }
}

/// The renderer-free engine: every resource, event, and system of the
/// simulation, in explicit per-tick order. Insert a custom [`config::SimConfig`]
/// or [`map::ObstacleMap`] before adding the plugin to override the defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::SimConfig>()
            .init_resource::<map::ObstacleMap>()
            .init_resource::<SimulationState>()
            .add_event::<population::SpawnRequest>()
            .add_event::<population::ConsumeEvent>()
            .add_systems(Startup, population::seed_population)
            .add_systems(
                Update,
                (
                    agent::tick_hunger,
                    agent::agent_behavior,
                    human::human_behavior,
                    motion::apply_wall_forces,
                    motion::integrate_motion,
                    motion::bounce_off_obstacles,
                    motion::confine_to_arena,
                    population::apply_consumes,
                )
                    .chain()
                    .run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
            )
            // spawn requests drain even while paused, so input made during a
            // pause is not lost to event expiry
            .add_systems(
                Update,
                population::apply_spawn_requests.after(population::apply_consumes),
            );
    }
}
