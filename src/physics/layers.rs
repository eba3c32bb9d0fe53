use avian3d::prelude::*;

/// Collision layers for the physics simulation
#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum GameLayer {
    #[default]
    Default,
    /// Player character
    Player,
    /// Walkable world geometry
    World,
    /// Edges the player can hang from
    Ledge,
    /// Triggers and sensors
    Trigger,
}
