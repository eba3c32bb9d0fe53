use bevy::prelude::*;

use super::controller::LocomotionController;
use super::state::MovementState;

/// Values an animation layer reads each tick
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationParams {
    /// Smoothed speed blend
    pub speed: f32,
    /// Input magnitude, for analog walk/run blending
    pub motion_speed: f32,
    pub grounded: bool,
    pub hanging: bool,
    /// Rising from a jump
    pub jump: bool,
    /// Airborne past the fall timeout
    pub free_fall: bool,
    pub vertical_velocity: f32,
}

impl AnimationParams {
    pub fn update(&mut self, controller: &LocomotionController) {
        let state = controller.state();
        let vertical_velocity = controller.vertical_velocity();

        self.speed = controller.motion().animation_blend();
        self.motion_speed = controller.input_magnitude();
        self.grounded = state == MovementState::Grounded;
        self.hanging = state == MovementState::Hanging;
        self.jump = state == MovementState::Airborne && vertical_velocity > 0.0;
        self.free_fall = controller.machine().is_free_falling();
        self.vertical_velocity = vertical_velocity;
    }
}
