use crate::agent::Agent;
use crate::config::SimConfig;
use crate::motion::{apply_force, Acceleration, Mass, Velocity};
use crate::steering;
use bevy::prelude::*;
use rand::Rng;

/// Passive prey. Humans share the motion components with agents by
/// composition but carry no hunger or target state of their own.
#[derive(Component)]
pub struct Human;

pub fn spawn_human(commands: &mut Commands, position: Vec2, config: &SimConfig) -> Entity {
    let mut rng = rand::thread_rng();
    let velocity = Vec2::new(
        rng.gen_range(-config.max_speed..config.max_speed),
        rng.gen_range(-config.max_speed..config.max_speed),
    );
    commands
        .spawn((
            Human,
            Velocity(velocity),
            Acceleration::default(),
            Mass::default(),
            Transform::from_xyz(position.x, position.y, 0.0),
        ))
        .id()
}

/// System to make every human run from the nearest agent, if one is within
/// the detection radius.
pub fn human_behavior(
    config: Res<SimConfig>,
    mut humans: Query<(&Transform, &mut Acceleration, &Mass), With<Human>>,
    agents: Query<&Transform, With<Agent>>,
) {
    let hunters: Vec<Vec2> = agents
        .iter()
        .map(|transform| transform.translation.truncate())
        .collect();
    if hunters.is_empty() {
        return;
    }

    for (transform, mut acceleration, mass) in humans.iter_mut() {
        let position = transform.translation.truncate();
        let threat = hunters
            .iter()
            .copied()
            .min_by(|a, b| {
                position
                    .distance_squared(*a)
                    .total_cmp(&position.distance_squared(*b))
            })
            .filter(|threat| position.distance(*threat) < config.flee_radius);

        if let Some(threat) = threat {
            let force = steering::flee(position, threat, &config.flee_gains);
            apply_force(&mut acceleration, mass, force, config.max_force);
        }
    }
}
