use std::f32::consts::TAU;

use avian3d::prelude::Position;
use bevy::prelude::*;

use crate::player::{ControlInput, LookSource, Player};

/// Look deltas with a smaller squared length are ignored
const LOOK_THRESHOLD: f32 = 0.01;

/// Marker for the yaw (horizontal rotation) entity
#[derive(Component)]
pub struct CameraYaw;

/// Marker for the pitch (vertical rotation) entity
#[derive(Component)]
pub struct CameraPitch;

/// Marker for the camera at the end of the boom
#[derive(Component)]
pub struct ThirdPersonCamera;

/// Camera configuration
#[derive(Component, Clone, Debug)]
pub struct CameraConfig {
    /// Radians per unit of pointer delta
    pub sensitivity: f32,
    /// Radians per second at full stick deflection
    pub stick_sensitivity: f32,
    /// Maximum pitch angle (looking up)
    pub top_clamp: f32,
    /// Minimum pitch angle (looking down)
    pub bottom_clamp: f32,
    /// Extra pitch applied on top of the look angle
    pub camera_angle_override: f32,
    /// Freezes the look angles
    pub lock_camera_position: bool,
    /// Height of the rig pivot above the body centre
    pub follow_height: f32,
    /// Distance from the pivot to the camera
    pub boom_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.003,
            stick_sensitivity: 3.0,
            top_clamp: 70.0_f32.to_radians(),
            bottom_clamp: (-30.0_f32).to_radians(),
            camera_angle_override: 0.0,
            lock_camera_position: false,
            follow_height: 0.5,
            boom_distance: 4.0,
        }
    }
}

/// Accumulated look angles in radians
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraAngles {
    /// Integrates one frame of look input. Independent of movement state.
    pub fn integrate(&mut self, look: Vec2, source: LookSource, config: &CameraConfig, dt: f32) {
        if config.lock_camera_position {
            return;
        }

        if look.length_squared() >= LOOK_THRESHOLD {
            // Pointer deltas are already per-frame
            let scale = match source {
                LookSource::Pointer => config.sensitivity,
                LookSource::Stick => config.stick_sensitivity * dt,
            };
            self.yaw -= look.x * scale;
            self.pitch -= look.y * scale;
        }

        self.yaw = wrap_angle(self.yaw);
        self.pitch = clamp_angle(self.pitch, config.bottom_clamp, config.top_clamp);
    }

    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn pitch_rotation(&self, config: &CameraConfig) -> Quat {
        Quat::from_rotation_x(self.pitch + config.camera_angle_override)
    }
}

/// Folds angles past a full turn back by one turn
pub fn wrap_angle(angle: f32) -> f32 {
    if angle < -TAU {
        angle + TAU
    } else if angle > TAU {
        angle - TAU
    } else {
        angle
    }
}

/// [`wrap_angle`] then clamp into `[min, max]`
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    wrap_angle(angle).clamp(min, max)
}

/// Applies look input to the rig angles and writes the rig rotations
pub fn apply_camera_look(
    player_query: Query<&ControlInput, With<Player>>,
    mut yaw_query: Query<(&mut Transform, &mut CameraAngles, &CameraConfig), With<CameraYaw>>,
    mut pitch_query: Query<&mut Transform, (With<CameraPitch>, Without<CameraYaw>)>,
    time: Res<Time>,
) {
    let Ok(input) = player_query.single() else {
        return;
    };
    let Ok((mut yaw_transform, mut angles, config)) = yaw_query.single_mut() else {
        return;
    };

    angles.integrate(input.look, input.look_source, config, time.delta_secs());
    yaw_transform.rotation = angles.yaw_rotation();

    if let Ok(mut pitch_transform) = pitch_query.single_mut() {
        pitch_transform.rotation = angles.pitch_rotation(config);
    }
}

/// Syncs the camera yaw position to follow the player
pub fn sync_camera_to_player(
    player_query: Query<&Position, With<Player>>,
    mut yaw_query: Query<(&mut Transform, &CameraConfig), (With<CameraYaw>, Without<Player>)>,
) {
    let Ok(position) = player_query.single() else {
        return;
    };

    if let Ok((mut yaw_transform, config)) = yaw_query.single_mut() {
        yaw_transform.translation = position.0 + Vec3::Y * config.follow_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_look_ignores_frame_time() {
        let config = CameraConfig::default();
        let mut fast = CameraAngles::default();
        let mut slow = CameraAngles::default();

        fast.integrate(Vec2::new(10.0, 0.0), LookSource::Pointer, &config, 1.0 / 144.0);
        slow.integrate(Vec2::new(10.0, 0.0), LookSource::Pointer, &config, 1.0 / 30.0);

        assert_eq!(fast, slow);
        assert!((fast.yaw + 0.03).abs() < 1e-6);
    }

    #[test]
    fn stick_look_scales_with_frame_time() {
        let config = CameraConfig::default();
        let mut angles = CameraAngles::default();

        angles.integrate(Vec2::new(-1.0, 0.0), LookSource::Stick, &config, 0.5);

        assert!((angles.yaw - config.stick_sensitivity * 0.5).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let config = CameraConfig::default();
        let mut angles = CameraAngles::default();

        angles.integrate(Vec2::new(0.0, -10_000.0), LookSource::Pointer, &config, 0.016);
        assert_eq!(angles.pitch, config.top_clamp);

        angles.integrate(Vec2::new(0.0, 10_000.0), LookSource::Pointer, &config, 0.016);
        assert_eq!(angles.pitch, config.bottom_clamp);
    }

    #[test]
    fn yaw_stays_within_a_turn() {
        let config = CameraConfig::default();
        let mut angles = CameraAngles::default();
        for _ in 0..100 {
            angles.integrate(Vec2::new(-500.0, 0.0), LookSource::Pointer, &config, 0.016);
            assert!(angles.yaw.abs() <= TAU);
        }
    }

    #[test]
    fn tiny_or_locked_input_is_a_no_op() {
        let mut config = CameraConfig::default();
        let mut angles = CameraAngles { yaw: 1.0, pitch: 0.2 };

        angles.integrate(Vec2::new(0.05, 0.05), LookSource::Pointer, &config, 0.016);
        assert_eq!(angles, CameraAngles { yaw: 1.0, pitch: 0.2 });

        config.lock_camera_position = true;
        angles.integrate(Vec2::new(100.0, 100.0), LookSource::Pointer, &config, 0.016);
        assert_eq!(angles, CameraAngles { yaw: 1.0, pitch: 0.2 });
    }

    #[test]
    fn override_only_affects_the_rig() {
        let config = CameraConfig {
            camera_angle_override: 0.25,
            ..default()
        };
        let angles = CameraAngles { yaw: 0.0, pitch: 0.1 };
        let expected = Quat::from_rotation_x(0.35);
        assert!(angles.pitch_rotation(&config).abs_diff_eq(expected, 1e-6));
        assert_eq!(angles.pitch, 0.1);
    }
}
