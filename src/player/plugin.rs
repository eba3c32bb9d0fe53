use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::animation::AnimationParams;
use super::audio::{AnimationCue, PlayerAudioMessage, relay_animation_cues};
use super::controller::{
    LocomotionController, LocomotionMessage, player_collision_layers, run_locomotion,
};
use super::input::{
    ControlInput, JumpAction, LookAction, MoveAction, SprintAction, StickLookAction,
    StickMoveAction, clear_look_input, handle_jump_end, handle_jump_start, handle_look_input,
    handle_move_end, handle_move_input, handle_sprint_end, handle_sprint_start,
    handle_stick_look_input, handle_stick_move_end, handle_stick_move_input,
};
use super::setup::validate_controller_setup;
use super::state::*;
use crate::camera::{CameraAngles, CameraConfig, CameraPitch, CameraYaw, ThirdPersonCamera};

/// Plugin for the third-person player controller
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EnhancedInputPlugin>() {
            app.add_plugins(EnhancedInputPlugin);
        }

        // Register input context for player
        app.add_input_context::<Player>();

        app.add_message::<LocomotionMessage>()
            .add_message::<AnimationCue>()
            .add_message::<PlayerAudioMessage>();

        app.add_observer(validate_controller_setup);

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        app.add_observer(handle_stick_move_input);
        app.add_observer(handle_stick_move_end);
        app.add_observer(handle_look_input);
        app.add_observer(handle_stick_look_input);
        app.add_observer(handle_sprint_start);
        app.add_observer(handle_sprint_end);
        app.add_observer(handle_jump_start);
        app.add_observer(handle_jump_end);

        // One locomotion tick per fixed step
        app.add_systems(FixedUpdate, run_locomotion);

        app.add_systems(Update, relay_animation_cues);

        // Clear look input at end of frame
        app.add_systems(Last, clear_look_input);
    }
}

/// Spawns the player entity, its camera rig, and all collaborators the
/// controller needs. Returns the player entity.
pub fn spawn_player(commands: &mut Commands, config: PlayerConfig, position: Vec3) -> Entity {
    let camera_config = CameraConfig::default();

    // Spawn yaw entity (rotates on Y axis for left/right look)
    let yaw_entity = commands
        .spawn((
            CameraYaw,
            CameraAngles::default(),
            camera_config.clone(),
            Transform::from_translation(position + Vec3::Y * camera_config.follow_height),
            Visibility::default(),
        ))
        .id();

    // Spawn pitch entity as child (rotates on X axis for up/down look)
    let pitch_entity = commands
        .spawn((CameraPitch, Transform::default(), Visibility::default()))
        .id();

    // Camera sits behind the pitch pivot
    let camera_entity = commands
        .spawn((
            ThirdPersonCamera,
            Camera3d::default(),
            Transform::from_translation(Vec3::Z * camera_config.boom_distance),
        ))
        .id();

    // Set up hierarchy: yaw -> pitch -> camera
    commands.entity(yaw_entity).add_child(pitch_entity);
    commands.entity(pitch_entity).add_child(camera_entity);

    let capsule_height = config.stand_height - config.radius * 2.0;

    commands
        .spawn((Player, config, ControlInput::default(), AnimationParams::default()))
        .insert((
            // Physics - dynamic body with locked rotation; velocity is set every tick
            RigidBody::Dynamic,
            Collider::capsule(config.radius, capsule_height),
            player_collision_layers(MovementState::Grounded),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            TranslationInterpolation,
            Friction::new(0.0),
            Restitution::new(0.0),
            GravityScale(0.0), // The controller integrates its own gravity
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<StickMoveAction>::new(),
                    DeadZone::default(),
                    bindings![
                        GamepadAxis::LeftStickX,
                        (GamepadAxis::LeftStickY, SwizzleAxis::YXZ),
                    ],
                ),
                (
                    Action::<LookAction>::new(),
                    bindings![Binding::mouse_motion()],
                ),
                (
                    Action::<StickLookAction>::new(),
                    DeadZone::default(),
                    bindings![
                        GamepadAxis::RightStickX,
                        (GamepadAxis::RightStickY, SwizzleAxis::YXZ),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<SprintAction>::new(),
                    bindings![KeyCode::ShiftLeft, GamepadButton::LeftTrigger],
                ),
            ]),
        )
        // Inserted last so setup validation sees every collaborator
        .insert(LocomotionController::facing(&config, 0.0))
        .id()
}
