use avian3d::prelude::LayerMask;
use bevy::prelude::*;

use crate::physics::GameLayer;

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration
#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerConfig {
    /// Walking speed in m/s
    pub move_speed: f32,
    /// Sprinting speed in m/s
    pub sprint_speed: f32,
    /// Time in seconds to turn towards the movement direction
    pub rotation_smooth_time: f32,
    /// Acceleration and deceleration rate
    pub speed_change_rate: f32,
    /// Height the player can jump in meters
    pub jump_height: f32,
    /// Gravity applied to the player (negative is down)
    pub gravity: f32,
    /// Maximum downward speed in m/s
    pub terminal_velocity: f32,
    /// Time that must pass before jumping again
    pub jump_timeout: f32,
    /// Time spent airborne before entering free fall
    pub fall_timeout: f32,
    /// Standing height of the body collider
    pub stand_height: f32,
    /// Collider radius
    pub radius: f32,
    /// Offset of the grounded check below the feet
    pub grounded_offset: f32,
    /// Radius of the grounded check sphere
    pub grounded_radius: f32,
    /// Layers treated as walkable ground. Includes ledges, which the body can stand on
    pub ground_layers: LayerMask,
    /// Layers treated as grabbable ledges
    pub ledge_layers: LayerMask,
    /// How far the ledge probe sweeps forward
    pub ledge_grab_distance: f32,
    /// Radius of the ledge probe
    pub ledge_grab_width: f32,
    /// Height of the ledge probe above the body centre
    pub ledge_grab_y_offset: f32,
    /// How far in front of the body the ledge probe starts
    pub ledge_probe_forward: f32,
    /// Half the lateral span of the ledge probe capsule
    pub ledge_probe_half_span: f32,
    /// Distance the hang position is pulled back from the ledge contact
    pub ledge_hang_inset: f32,
    /// Distance the hang position sits below the ledge contact
    pub ledge_hang_drop: f32,
    /// Sideways speed while hanging in m/s
    pub ledge_shimmy_speed: f32,
    /// Seconds after letting go before another ledge can be grabbed
    pub ledge_regrab_cooldown: f32,
    /// Number of footstep clips the audio layer picks from
    pub footstep_variants: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            sprint_speed: 5.335,
            rotation_smooth_time: 0.12,
            speed_change_rate: 10.0,
            jump_height: 1.2,
            gravity: -15.0,
            terminal_velocity: 53.0,
            jump_timeout: 0.5,
            fall_timeout: 0.15,
            stand_height: 1.8,
            radius: 0.28,
            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: [GameLayer::World, GameLayer::Ledge].into(),
            ledge_layers: GameLayer::Ledge.into(),
            ledge_grab_distance: 0.2,
            ledge_grab_width: 0.2,
            ledge_grab_y_offset: 0.6,
            ledge_probe_forward: 0.1,
            ledge_probe_half_span: 0.3,
            ledge_hang_inset: 0.1,
            ledge_hang_drop: 0.1,
            ledge_shimmy_speed: 1.6,
            ledge_regrab_cooldown: 0.25,
            footstep_variants: 4,
        }
    }
}

impl PlayerConfig {
    /// Vertical speed needed to reach `jump_height` under `gravity`
    pub fn jump_launch_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).sqrt()
    }
}

/// Discrete locomotion state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    Grounded,
    Airborne,
    Hanging,
}

/// Position of the body centre and its horizontal facing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPose {
    pub position: Vec3,
    /// Unit forward vector, parallel to the ground plane
    pub forward: Vec3,
}

impl CharacterPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::NEG_Z);
        Self { position, forward }
    }

    /// Pose facing `yaw` radians around +Y (0 faces -Z)
    pub fn from_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            forward: facing_from_yaw(yaw),
        }
    }

    pub fn from_rotation(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation * Vec3::NEG_Z)
    }

    pub fn yaw(&self) -> f32 {
        yaw_from_facing(self.forward)
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.forward = facing_from_yaw(yaw);
    }

    /// `forward × up`, pointing to the character's right
    pub fn right(&self) -> Vec3 {
        self.forward.cross(Vec3::Y)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw())
    }
}

/// Unit horizontal direction for a yaw angle
pub fn facing_from_yaw(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::NEG_Z
}

/// Yaw angle of a horizontal direction (inverse of [`facing_from_yaw`])
pub fn yaw_from_facing(forward: Vec3) -> f32 {
    (-forward.x).atan2(-forward.z)
}

/// Pose captured when grabbing a ledge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HangAnchor {
    pub position: Vec3,
    /// Faces into the wall, parallel to the ground plane
    pub forward: Vec3,
}
