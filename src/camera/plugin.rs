use bevy::prelude::*;

use super::look::*;

/// Plugin for the third-person camera rig
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (sync_camera_to_player, apply_camera_look).chain());
    }
}
