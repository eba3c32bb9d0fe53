use avian3d::prelude::*;
use bevy::prelude::*;

use super::animation::AnimationParams;
use super::input::ControlInput;
use super::ledge::LedgeDetector;
use super::machine::{MachineInput, MovementStateMachine};
use super::movement::HorizontalMotion;
use super::state::*;
use crate::camera::CameraAngles;
use crate::physics::{CollisionQuery, GameLayer, is_on_ground};

/// Semantic events produced by a locomotion tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionEvent {
    Jumped,
    Landed { impact_speed: f32 },
    LedgeGrabbed { anchor: HangAnchor },
    LedgeReleased,
    FreeFallStarted,
}

/// Gameplay message wrapping a [`LocomotionEvent`] for a player entity
#[derive(Message, Debug, Clone, Copy)]
pub struct LocomotionMessage {
    pub entity: Entity,
    pub event: LocomotionEvent,
}

/// Inputs for one tick that do not belong to the controller itself
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub input: ControlInput,
    /// Yaw of the camera rig, which makes move input camera-relative
    pub camera_yaw: f32,
    /// Horizontal speed the mover actually achieved last tick
    pub measured_speed: f32,
    pub dt: f32,
}

/// Output of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Translation to request from the mover this tick
    pub displacement: Vec3,
    /// The jump request was used or discarded
    pub jump_consumed: bool,
    pub events: Vec<LocomotionEvent>,
}

/// Locomotion state for one character: the movement state machine, the hang
/// anchor while hanging, and smoothed horizontal motion.
#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    machine: MovementStateMachine,
    motion: HorizontalMotion,
    anchor: Option<HangAnchor>,
    regrab_cooldown: f32,
    input_magnitude: f32,
}

impl LocomotionController {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            machine: MovementStateMachine::new(config),
            motion: HorizontalMotion::default(),
            anchor: None,
            regrab_cooldown: 0.0,
            input_magnitude: 0.0,
        }
    }

    /// Controller already facing `yaw`, so the first move does not snap
    pub fn facing(config: &PlayerConfig, yaw: f32) -> Self {
        Self {
            motion: HorizontalMotion::facing(yaw),
            ..Self::new(config)
        }
    }

    pub fn state(&self) -> MovementState {
        self.machine.state()
    }

    pub fn machine(&self) -> &MovementStateMachine {
        &self.machine
    }

    pub fn motion(&self) -> &HorizontalMotion {
        &self.motion
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.machine.vertical_velocity()
    }

    pub fn anchor(&self) -> Option<&HangAnchor> {
        self.anchor.as_ref()
    }

    /// Puts the character mid-air with the given vertical velocity, letting go
    /// of any ledge. For knockbacks and spawning above the ground.
    pub fn launch(&mut self, vertical_velocity: f32, config: &PlayerConfig) {
        if self.anchor.take().is_some() {
            self.regrab_cooldown = config.ledge_regrab_cooldown;
        }
        self.machine.launch(vertical_velocity, config);
    }

    /// Input magnitude used on the last tick
    pub fn input_magnitude(&self) -> f32 {
        self.input_magnitude
    }

    /// Runs one simulation tick: ledge check, grounded check, state machine,
    /// then horizontal movement. Mutates `pose` for facing changes and ledge
    /// snaps; the returned displacement is left for the mover.
    pub fn tick(
        &mut self,
        pose: &mut CharacterPose,
        ctx: &TickContext,
        config: &PlayerConfig,
        world: &impl CollisionQuery,
    ) -> TickReport {
        let mut report = TickReport::default();
        let dt = ctx.dt;
        if dt <= 0.0 {
            return report;
        }

        self.regrab_cooldown = (self.regrab_cooldown - dt).max(0.0);
        let detector = LedgeDetector::new(config);

        let mut ledge_grabbed = false;
        if self.machine.can_grab_ledge() && self.regrab_cooldown <= 0.0 {
            if let Some(hit) = detector.detect(world, pose) {
                let anchor = detector.anchor(&hit, pose);
                pose.position = anchor.position;
                pose.forward = anchor.forward;
                self.anchor = Some(anchor);
                ledge_grabbed = true;
            }
        }

        let grounded = self.machine.state() != MovementState::Hanging
            && !ledge_grabbed
            && is_on_ground(world, pose.position, config);

        let outcome = self.machine.step(
            MachineInput {
                grounded,
                jump_requested: ctx.input.jump,
                ledge_grabbed,
                dt,
            },
            config,
        );
        report.jump_consumed = outcome.jump_consumed;

        if let Some(impact_speed) = outcome.landed {
            report.events.push(LocomotionEvent::Landed { impact_speed });
        }
        if outcome.grabbed_ledge {
            if let Some(anchor) = self.anchor {
                report.events.push(LocomotionEvent::LedgeGrabbed { anchor });
            }
        }
        if outcome.released_ledge {
            self.anchor = None;
            self.regrab_cooldown = config.ledge_regrab_cooldown;
            report.events.push(LocomotionEvent::LedgeReleased);
        }
        if outcome.jumped {
            report.events.push(LocomotionEvent::Jumped);
        }
        if outcome.free_fall_started {
            report.events.push(LocomotionEvent::FreeFallStarted);
        }

        let hanging = self.machine.state() == MovementState::Hanging;
        self.input_magnitude = ctx.input.input_magnitude();

        let step = self.motion.resolve(
            ctx.input.movement,
            ctx.input.sprint,
            self.input_magnitude,
            ctx.measured_speed,
            pose.yaw(),
            ctx.camera_yaw,
            !hanging,
            config,
            dt,
        );

        report.displacement = if hanging {
            let lateral = ctx.input.movement.normalize_or_zero().x;
            detector.shimmy(world, pose, lateral, dt)
        } else {
            if step.facing_yaw != pose.yaw() {
                pose.set_yaw(step.facing_yaw);
            }
            step.velocity * dt + Vec3::Y * self.machine.vertical_velocity() * dt
        };

        report
    }
}

/// Collision layers for the player body in `state`.
///
/// The hang anchor sits closer to the wall than the body radius, so while
/// hanging the body stops colliding with level geometry and stays where the
/// anchor put it.
pub fn player_collision_layers(state: MovementState) -> CollisionLayers {
    match state {
        MovementState::Hanging => CollisionLayers::new(GameLayer::Player, [GameLayer::Trigger]),
        MovementState::Grounded | MovementState::Airborne => CollisionLayers::new(
            GameLayer::Player,
            [GameLayer::World, GameLayer::Ledge, GameLayer::Trigger],
        ),
    }
}

/// Updates `layers` for `state`. Returns true if anything changed.
pub fn sync_collision_layers(layers: &mut CollisionLayers, state: MovementState) -> bool {
    let wanted = player_collision_layers(state);
    if layers.memberships.0 == wanted.memberships.0 && layers.filters.0 == wanted.filters.0 {
        return false;
    }
    *layers = wanted;
    true
}

/// Runs the locomotion tick for every player and hands the result to the
/// Avian mover as a velocity.
pub fn run_locomotion(
    spatial_query: SpatialQuery,
    mut query: Query<
        (
            Entity,
            &mut Position,
            &mut Rotation,
            &mut LinearVelocity,
            &PlayerConfig,
            &mut LocomotionController,
            &mut ControlInput,
            &mut AnimationParams,
            Option<&mut CollisionLayers>,
        ),
        With<Player>,
    >,
    rig_query: Query<&CameraAngles>,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let camera_yaw = rig_query.single().map(|angles| angles.yaw).unwrap_or(0.0);

    for (
        entity,
        mut position,
        mut rotation,
        mut lin_vel,
        config,
        mut controller,
        mut input,
        mut anim,
        layers,
    ) in &mut query
    {
        let mut pose = CharacterPose::from_rotation(position.0, rotation.0);
        let before = pose;

        let ctx = TickContext {
            input: *input,
            camera_yaw,
            measured_speed: Vec2::new(lin_vel.x, lin_vel.z).length(),
            dt,
        };
        let report = controller.tick(&mut pose, &ctx, config, &spatial_query);

        if pose.position != before.position {
            position.0 = pose.position;
        }
        if pose.forward != before.forward {
            rotation.0 = pose.rotation();
        }

        let velocity = report.displacement / dt;
        if velocity.is_finite() {
            lin_vel.0 = velocity;
        } else {
            warn!("non-finite locomotion velocity {velocity} for {entity}, stopping");
            lin_vel.0 = Vec3::ZERO;
        }

        if report.jump_consumed {
            input.jump = false;
        }

        if let Some(mut layers) = layers {
            if sync_collision_layers(&mut layers, controller.state()) {
                debug!("{entity}: collision layers set for {:?}", controller.state());
            }
        }

        anim.update(&controller);

        for event in report.events {
            debug!("{entity}: {event:?} ({:?})", controller.state());
            writer.write(LocomotionMessage { entity, event });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collides_with(layers: &CollisionLayers, layer: GameLayer) -> bool {
        layers.filters.0 & LayerMask::from(layer).0 != 0
    }

    #[test]
    fn hanging_body_ignores_level_geometry() {
        let hanging = player_collision_layers(MovementState::Hanging);
        assert!(!collides_with(&hanging, GameLayer::World));
        assert!(!collides_with(&hanging, GameLayer::Ledge));
        assert!(collides_with(&hanging, GameLayer::Trigger));

        for state in [MovementState::Grounded, MovementState::Airborne] {
            let free = player_collision_layers(state);
            assert!(collides_with(&free, GameLayer::World));
            assert!(collides_with(&free, GameLayer::Ledge));
            assert_eq!(free.memberships.0, hanging.memberships.0);
        }
    }

    #[test]
    fn layers_follow_the_hang() {
        let mut layers = player_collision_layers(MovementState::Airborne);

        assert!(sync_collision_layers(&mut layers, MovementState::Hanging));
        assert!(!sync_collision_layers(&mut layers, MovementState::Hanging));
        assert!(!collides_with(&layers, GameLayer::Ledge));

        assert!(sync_collision_layers(&mut layers, MovementState::Airborne));
        assert!(collides_with(&layers, GameLayer::World));
        assert!(!sync_collision_layers(&mut layers, MovementState::Grounded));
    }
}
