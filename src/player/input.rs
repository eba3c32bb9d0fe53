use bevy::ecs::observer::On;
use bevy::prelude::{Component, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

/// Move in a direction (WASD)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Move with an analog stick
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct StickMoveAction;

/// Look around (mouse delta)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct LookAction;

/// Look around with an analog stick
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct StickLookAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Sprint action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SprintAction;

/// Where the current look delta came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookSource {
    /// Mouse or other pointing device; already frame-normalized
    #[default]
    Pointer,
    /// Analog stick; a rate that must be scaled by frame time
    Stick,
}

/// Per-frame input snapshot consumed by the locomotion tick
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ControlInput {
    pub movement: Vec2,
    pub look: Vec2,
    pub look_source: LookSource,
    pub sprint: bool,
    /// Set while held; cleared on release or once the controller uses or discards it
    pub jump: bool,
    /// Movement came from an analog device, so its magnitude matters
    pub analog_movement: bool,
}

impl ControlInput {
    /// Magnitude that scales the target speed
    pub fn input_magnitude(&self) -> f32 {
        if self.analog_movement {
            self.movement.length().min(1.0)
        } else {
            1.0
        }
    }
}

pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.movement = trigger.value;
        input.analog_movement = false;
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.movement = Vec2::ZERO;
    }
}

pub fn handle_stick_move_input(
    trigger: On<Fire<StickMoveAction>>,
    mut query: Query<&mut ControlInput>,
) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.movement = trigger.value;
        input.analog_movement = true;
    }
}

pub fn handle_stick_move_end(
    trigger: On<Complete<StickMoveAction>>,
    mut query: Query<&mut ControlInput>,
) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.movement = Vec2::ZERO;
    }
}

pub fn handle_look_input(trigger: On<Fire<LookAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.look = trigger.value;
        input.look_source = LookSource::Pointer;
    }
}

pub fn handle_stick_look_input(
    trigger: On<Fire<StickLookAction>>,
    mut query: Query<&mut ControlInput>,
) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.look = trigger.value;
        input.look_source = LookSource::Stick;
    }
}

pub fn handle_sprint_start(trigger: On<Start<SprintAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.sprint = true;
    }
}

pub fn handle_sprint_end(trigger: On<Complete<SprintAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.sprint = false;
    }
}

pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.jump = true;
    }
}

pub fn handle_jump_end(trigger: On<Complete<JumpAction>>, mut query: Query<&mut ControlInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.jump = false;
    }
}

/// Clears look input each frame
pub fn clear_look_input(mut query: Query<&mut ControlInput>) {
    for mut input in &mut query {
        input.look = Vec2::ZERO;
    }
}
