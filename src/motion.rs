//! Motion components and the per-tick integration step.

use crate::config::{BoundaryPolicy, SimConfig};
use crate::map::ObstacleMap;
use crate::steering::{self, clamp_force};
use bevy::prelude::*;

/// Current heading and speed; magnitude is clamped to `max_speed` after
/// integration.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity(pub Vec2);

/// Force accumulator; zeroed after every integration step.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Acceleration(pub Vec2);

/// Force-to-acceleration divisor.
#[derive(Component, Clone, Copy, Debug)]
pub struct Mass(pub f32);

impl Default for Mass {
    fn default() -> Self {
        Mass(1.0)
    }
}

/// Adds a single steering force to the accumulator, clamping it to
/// `max_force` first when one is configured.
pub fn apply_force(acceleration: &mut Acceleration, mass: &Mass, force: Vec2, max_force: Option<f32>) {
    acceleration.0 += clamp_force(force, max_force) / mass.0;
}

/// System to push every mover inward when it strays into the wall margin.
/// Inactive under the wrap boundary policy.
pub fn apply_wall_forces(
    config: Res<SimConfig>,
    mut movers: Query<(&Transform, &mut Acceleration, &Mass)>,
) {
    if config.boundary_policy == BoundaryPolicy::Wrap {
        return;
    }
    for (transform, mut acceleration, mass) in movers.iter_mut() {
        let force = steering::wall_repel(
            transform.translation.truncate(),
            config.arena_size(),
            config.wall_margin,
            config.wall_force,
        );
        if force != Vec2::ZERO {
            apply_force(&mut acceleration, mass, force, config.max_force);
        }
    }
}

/// System to integrate motion for every mover: apply the accumulated
/// acceleration, clamp speed, advance position, and reset the accumulator.
pub fn integrate_motion(
    config: Res<SimConfig>,
    mut movers: Query<(&mut Transform, &mut Velocity, &mut Acceleration)>,
) {
    for (mut transform, mut velocity, mut acceleration) in movers.iter_mut() {
        velocity.0 = (velocity.0 + acceleration.0).clamp_length_max(config.max_speed);
        transform.translation += velocity.0.extend(0.0);
        acceleration.0 = Vec2::ZERO;
    }
}

/// System to reflect movers that ended up inside an obstacle: negate the
/// velocity and advance one extra step along it. An instantaneous elastic
/// bounce, not a swept collision — fast movers can tunnel through thin
/// obstacles.
pub fn bounce_off_obstacles(
    map: Res<ObstacleMap>,
    mut movers: Query<(&mut Transform, &mut Velocity)>,
) {
    if map.is_empty() {
        return;
    }
    for (mut transform, mut velocity) in movers.iter_mut() {
        if map.contains(transform.translation.truncate()) {
            velocity.0 = -velocity.0;
            transform.translation += velocity.0.extend(0.0);
        }
    }
}

/// System to apply the configured boundary policy to positions that left the
/// arena. Bounce relies on the wall force alone and tolerates a small
/// overshoot; wrap folds positions modulo the arena size.
pub fn confine_to_arena(
    config: Res<SimConfig>,
    mut movers: Query<&mut Transform, With<Velocity>>,
) {
    if config.boundary_policy != BoundaryPolicy::Wrap {
        return;
    }
    let arena = config.arena_size();
    for mut transform in movers.iter_mut() {
        transform.translation.x = transform.translation.x.rem_euclid(arena.x);
        transform.translation.y = transform.translation.y.rem_euclid(arena.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_divides_applied_force() {
        let mut acceleration = Acceleration::default();
        apply_force(&mut acceleration, &Mass(2.0), Vec2::new(4.0, 0.0), None);
        assert_eq!(acceleration.0, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn force_clamp_happens_before_accumulation() {
        let mut acceleration = Acceleration::default();
        apply_force(&mut acceleration, &Mass(1.0), Vec2::new(3.0, 0.0), Some(1.0));
        apply_force(&mut acceleration, &Mass(1.0), Vec2::new(3.0, 0.0), Some(1.0));
        // two clamped forces accumulate, they are not clamped jointly
        assert_eq!(acceleration.0, Vec2::new(2.0, 0.0));
    }
}
