use bevy::prelude::*;

use super::CollisionQuery;
use crate::player::PlayerConfig;

/// Centre of the grounded-check sphere for a body centred at `position`.
///
/// `grounded_offset` is measured downwards from the feet, so the default
/// negative offset lifts the sphere slightly above them.
pub fn ground_probe_center(position: Vec3, config: &PlayerConfig) -> Vec3 {
    let feet_y = position.y - config.stand_height / 2.0;
    Vec3::new(position.x, feet_y - config.grounded_offset, position.z)
}

/// Checks if a body centred at `position` rests on ground
pub fn is_on_ground(world: &impl CollisionQuery, position: Vec3, config: &PlayerConfig) -> bool {
    world.check_sphere(
        ground_probe_center(position, config),
        config.grounded_radius,
        config.ground_layers,
    )
}
