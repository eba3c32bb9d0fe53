use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use super::state::{PlayerConfig, facing_from_yaw};

/// Measured speed within this band of the target snaps straight to it
pub const SPEED_OFFSET: f32 = 0.1;

/// Animation blend values below this settle to zero
const BLEND_EPSILON: f32 = 0.01;

/// Smoothed horizontal speed and facing, carried between ticks
#[derive(Debug, Clone, Default)]
pub struct HorizontalMotion {
    speed: f32,
    animation_blend: f32,
    target_yaw: f32,
    yaw_velocity: f32,
}

/// Result of resolving one tick of horizontal movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalStep {
    /// Facing yaw after smoothing
    pub facing_yaw: f32,
    /// Horizontal velocity in m/s
    pub velocity: Vec3,
}

impl HorizontalMotion {
    /// Starts facing `yaw` with no speed
    pub fn facing(yaw: f32) -> Self {
        Self {
            target_yaw: yaw,
            ..default()
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn animation_blend(&self) -> f32 {
        self.animation_blend
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    /// Speed the character is trying to reach before analog scaling
    pub fn target_speed(move_input: Vec2, sprint: bool, config: &PlayerConfig) -> f32 {
        if move_input == Vec2::ZERO {
            0.0
        } else if sprint {
            config.sprint_speed
        } else {
            config.move_speed
        }
    }

    /// Updates speed and facing from input.
    ///
    /// `steer` is false while hanging, which freezes facing. `camera_yaw`
    /// makes input camera-relative.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        &mut self,
        move_input: Vec2,
        sprint: bool,
        input_magnitude: f32,
        measured_speed: f32,
        current_yaw: f32,
        camera_yaw: f32,
        steer: bool,
        config: &PlayerConfig,
        dt: f32,
    ) -> HorizontalStep {
        let target_speed = Self::target_speed(move_input, sprint, config);
        let rate = (dt * config.speed_change_rate).clamp(0.0, 1.0);

        self.speed = approach_speed(measured_speed, target_speed, input_magnitude, rate);

        self.animation_blend += (target_speed - self.animation_blend) * rate;
        if self.animation_blend < BLEND_EPSILON {
            self.animation_blend = 0.0;
        }

        let mut facing_yaw = current_yaw;
        if move_input != Vec2::ZERO && steer {
            self.target_yaw = input_yaw(move_input) + camera_yaw;
            facing_yaw = smooth_damp_angle(
                current_yaw,
                self.target_yaw,
                &mut self.yaw_velocity,
                config.rotation_smooth_time,
                dt,
            );
        }

        HorizontalStep {
            facing_yaw,
            velocity: facing_from_yaw(self.target_yaw) * self.speed,
        }
    }
}

/// Eases `current` towards `target * input_magnitude`, rounded to millimetres per second.
///
/// Within [`SPEED_OFFSET`] of the target the result is the target itself.
pub fn approach_speed(current: f32, target: f32, input_magnitude: f32, rate: f32) -> f32 {
    if current < target - SPEED_OFFSET || current > target + SPEED_OFFSET {
        let eased = current + (target * input_magnitude - current) * rate.clamp(0.0, 1.0);
        (eased * 1000.0).round() / 1000.0
    } else {
        target
    }
}

/// Yaw of a move input relative to the view, with +Y on the stick meaning forward
pub fn input_yaw(move_input: Vec2) -> f32 {
    let direction = move_input.normalize_or_zero();
    (-direction.x).atan2(direction.y)
}

/// Shortest signed difference between two angles, in `[-PI, PI)`
pub fn delta_angle(current: f32, target: f32) -> f32 {
    (target - current + PI).rem_euclid(TAU) - PI
}

/// Critically damped spring towards `target`.
///
/// `velocity` is carried between calls. Never overshoots the target.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// [`smooth_damp`] along the shortest arc between two angles in radians
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}
