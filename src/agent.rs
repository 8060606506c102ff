use crate::config::{SimConfig, HUNGER_MAX};
use crate::food::Food;
use crate::human::Human;
use crate::motion::{apply_force, Acceleration, Mass, Velocity};
use crate::population::{ConsumeEvent, PreyKind};
use crate::steering::{self, Flockmate};
use bevy::prelude::*;
use rand::Rng;

/// Agent component: hunger drives the behavior switch, `target` is the prey
/// locked this tick (recomputed every tick, never shared between agents).
#[derive(Component)]
pub struct Agent {
    pub hunger: f32,
    pub target: Option<Entity>,
}

impl Agent {
    pub fn new(hunger: f32) -> Self {
        Self {
            hunger: hunger.clamp(0.0, HUNGER_MAX),
            target: None,
        }
    }

    /// Rendering hint; above the threshold the agent hunts instead of
    /// flocking.
    pub fn is_hungry(&self, threshold: f32) -> bool {
        self.hunger > threshold
    }
}

/// Spawns an agent with randomized velocity and hunger.
pub fn spawn_agent(commands: &mut Commands, position: Vec2, config: &SimConfig) -> Entity {
    let mut rng = rand::thread_rng();
    let velocity = Vec2::new(
        rng.gen_range(-config.max_speed..config.max_speed),
        rng.gen_range(-config.max_speed..config.max_speed),
    );
    commands
        .spawn((
            Agent::new(rng.gen_range(0.0..=HUNGER_MAX)),
            Velocity(velocity),
            Acceleration::default(),
            Mass::default(),
            Transform::from_xyz(position.x, position.y, 0.0),
        ))
        .id()
}

/// System to advance hunger for every agent, capped at the ceiling. Runs
/// every tick regardless of behavior state.
pub fn tick_hunger(config: Res<SimConfig>, mut agents: Query<&mut Agent>) {
    for mut agent in agents.iter_mut() {
        agent.hunger = (agent.hunger + config.hunger_rate).min(HUNGER_MAX);
    }
}

/// System running the hunger state machine for every agent against a
/// start-of-tick snapshot of the population.
///
/// Fed (or nothing to hunt): flock with the other agents. Hungry with prey
/// available: lock the nearest human or food and seek it, flocking
/// suspended; within eating range, request the consumption and release the
/// target. The actual population mutation is deferred to
/// [`crate::population::apply_consumes`].
pub fn agent_behavior(
    config: Res<SimConfig>,
    mut agents: Query<(
        Entity,
        &mut Agent,
        &Transform,
        &Velocity,
        &mut Acceleration,
        &Mass,
    )>,
    humans: Query<(Entity, &Transform), With<Human>>,
    foods: Query<(Entity, &Transform), With<Food>>,
    mut consume_events: EventWriter<ConsumeEvent>,
) {
    let flockmates: Vec<Flockmate> = agents
        .iter()
        .map(|(entity, _, transform, velocity, _, _)| {
            (entity, transform.translation.truncate(), velocity.0)
        })
        .collect();

    let prey: Vec<(Entity, Vec2, PreyKind)> = humans
        .iter()
        .map(|(entity, transform)| (entity, transform.translation.truncate(), PreyKind::Human))
        .chain(
            foods
                .iter()
                .map(|(entity, transform)| (entity, transform.translation.truncate(), PreyKind::Food)),
        )
        .collect();

    for (entity, mut agent, transform, _, mut acceleration, mass) in agents.iter_mut() {
        let position = transform.translation.truncate();

        let locked = if agent.is_hungry(config.hunger_threshold) {
            // nearest prey by straight-line distance; ties go to the first
            // one encountered
            prey.iter()
                .copied()
                .min_by(|a, b| {
                    position
                        .distance_squared(a.1)
                        .total_cmp(&position.distance_squared(b.1))
                })
        } else {
            None
        };

        match locked {
            Some((target, target_position, kind)) => {
                agent.target = Some(target);
                let force = steering::seek(position, target_position, &config.seek_gains);
                apply_force(&mut acceleration, mass, force, config.max_force);

                if position.distance(target_position) < config.eat_distance {
                    consume_events.send(ConsumeEvent {
                        agent: entity,
                        target,
                        kind,
                    });
                    agent.target = None;
                }
            }
            None => {
                agent.target = None;
                let hood = steering::neighbors_within(
                    position,
                    config.flock_radius,
                    entity,
                    &flockmates,
                );
                let crowd = steering::neighbors_within(
                    position,
                    config.separation_radius,
                    entity,
                    &flockmates,
                );
                for force in [
                    steering::cohere(position, &hood, config.cohesion_gain),
                    steering::align(&hood, config.alignment_gain),
                    steering::separate(position, &crowd, config.separation_gain),
                ] {
                    apply_force(&mut acceleration, mass, force, config.max_force);
                }
            }
        }
    }
}
