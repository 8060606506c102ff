use bevy::prelude::*;

/// Dropped food: a consumable with a position and nothing else. Food never
/// moves, so it carries no motion components and skips integration entirely.
#[derive(Component)]
pub struct Food;

pub fn spawn_food(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((Food, Transform::from_xyz(position.x, position.y, 0.0)))
        .id()
}
