pub mod camera;
pub mod physics;
pub mod player;

pub use camera::CameraPlugin;
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics, player controller, and camera systems.
pub struct LedgeLocomotionPlugin;

impl Plugin for LedgeLocomotionPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin);
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::camera::{CameraAngles, CameraConfig, CameraPlugin, ThirdPersonCamera};
    pub use crate::physics::{CastHit, CollisionQuery, GameLayer, PhysicsPlugin};
    pub use crate::player::{
        AnimationCue, AnimationParams, CharacterPose, ControlInput, CueKind, HangAnchor,
        LocomotionController, LocomotionEvent, LocomotionMessage, MovementState, Player,
        PlayerAudioMessage, PlayerConfig, PlayerPlugin, spawn_player,
    };
    pub use crate::LedgeLocomotionPlugin;
}
