//! The population mutation protocol: spawn requests and consumptions are
//! collected as events during the tick and applied here, after integration,
//! through `Commands`. Entities created this way join the world at the next
//! tick, never mid-tick.

use crate::agent::{spawn_agent, Agent};
use crate::config::{SimConfig, EAT_RELIEF};
use crate::food::{spawn_food, Food};
use crate::human::{spawn_human, Human};
use crate::map::ObstacleMap;
use bevy::prelude::*;
use bevy::utils::HashSet;
use log::debug;
use rand::rngs::ThreadRng;
use rand::Rng;

/// What a spawn request should create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    Agent,
    Human,
    Food,
}

/// External spawn input (mouse clicks, seeding, tests). Rejected silently
/// when the position probes into an obstacle or a population ceiling is
/// reached.
#[derive(Event, Clone, Copy, Debug)]
pub struct SpawnRequest {
    pub position: Vec2,
    pub kind: SpawnKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreyKind {
    Human,
    Food,
}

/// A consumption requested by an agent that reached its target this tick.
#[derive(Event, Clone, Copy, Debug)]
pub struct ConsumeEvent {
    pub agent: Entity,
    pub target: Entity,
    pub kind: PreyKind,
}

/// Startup system seeding the initial populations at obstacle-free random
/// positions.
pub fn seed_population(
    mut commands: Commands,
    config: Res<SimConfig>,
    map: Res<ObstacleMap>,
) {
    let mut rng = rand::thread_rng();
    for _ in 0..config.initial_humans {
        if let Some(position) = random_clear_position(&mut rng, &config, &map) {
            spawn_human(&mut commands, position, &config);
        }
    }
    for _ in 0..config.initial_agents {
        if let Some(position) = random_clear_position(&mut rng, &config, &map) {
            spawn_agent(&mut commands, position, &config);
        }
    }
}

/// Bounded retry so a heavily covered map cannot hang startup.
fn random_clear_position(
    rng: &mut ThreadRng,
    config: &SimConfig,
    map: &ObstacleMap,
) -> Option<Vec2> {
    for _ in 0..100 {
        let position = Vec2::new(
            rng.gen_range(0.0..config.arena_width),
            rng.gen_range(0.0..config.arena_height),
        );
        if !map.blocks_spawn(position, config.spawn_probe_size) {
            return Some(position);
        }
    }
    None
}

/// System applying the consumptions requested this tick.
///
/// When several agents reached the same target, the first request in agent
/// iteration order wins and the rest are dropped. Consuming a human
/// atomically removes it and spawns a new agent at its last position;
/// consuming food only removes the food. Either way the eater's hunger drops
/// by the fixed relief, floored at zero.
pub fn apply_consumes(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut events: EventReader<ConsumeEvent>,
    mut agents: Query<&mut Agent>,
    prey: Query<&Transform, Or<(With<Human>, With<Food>)>>,
) {
    let mut consumed: HashSet<Entity> = HashSet::default();
    for event in events.read() {
        if !consumed.insert(event.target) {
            continue;
        }
        // despawns are deferred, so a target that vanished between ticks
        // simply fails the lookup and the request is dropped
        let Ok(transform) = prey.get(event.target) else {
            continue;
        };
        let position = transform.translation.truncate();

        commands.entity(event.target).despawn();
        if event.kind == PreyKind::Human {
            spawn_agent(&mut commands, position, &config);
        }
        if let Ok(mut agent) = agents.get_mut(event.agent) {
            agent.hunger = (agent.hunger - EAT_RELIEF).max(0.0);
        }
        debug!("{:?} consumed at ({:.1}, {:.1})", event.kind, position.x, position.y);
    }
}

/// System applying the spawn requests collected this tick, validating each
/// against the obstacle probe and the population ceilings.
pub fn apply_spawn_requests(
    mut commands: Commands,
    config: Res<SimConfig>,
    map: Res<ObstacleMap>,
    mut requests: EventReader<SpawnRequest>,
    agents: Query<(), With<Agent>>,
    humans: Query<(), With<Human>>,
    foods: Query<(), With<Food>>,
) {
    let mut agent_count = agents.iter().count();
    let mut prey_count = humans.iter().count() + foods.iter().count();

    for request in requests.read() {
        if map.blocks_spawn(request.position, config.spawn_probe_size) {
            debug!("spawn rejected, obstacle at {:?}", request.position);
            continue;
        }
        match request.kind {
            SpawnKind::Agent => {
                if config.max_agents.is_some_and(|max| agent_count >= max) {
                    debug!("spawn rejected, agent ceiling reached");
                    continue;
                }
                spawn_agent(&mut commands, request.position, &config);
                agent_count += 1;
            }
            SpawnKind::Human | SpawnKind::Food => {
                if config.max_prey.is_some_and(|max| prey_count >= max) {
                    debug!("spawn rejected, prey ceiling reached");
                    continue;
                }
                if request.kind == SpawnKind::Human {
                    spawn_human(&mut commands, request.position, &config);
                } else {
                    spawn_food(&mut commands, request.position);
                }
                prey_count += 1;
            }
        }
    }
}
