use std::fmt;

use avian3d::prelude::*;
use bevy::prelude::*;

use super::controller::LocomotionController;

/// A player entity was spawned without a collaborator the controller needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// No rigid body or velocity to move
    MissingMover(Entity),
    /// No collider to rest on the ground with
    MissingCollider(Entity),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMover(entity) => {
                write!(f, "locomotion controller on {entity} has no RigidBody/LinearVelocity mover")
            }
            Self::MissingCollider(entity) => {
                write!(f, "locomotion controller on {entity} has no Collider")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Checks a newly added controller once, instead of probing collaborators every tick.
pub fn validate_controller_setup(
    add: On<Add, LocomotionController>,
    query: Query<(Has<RigidBody>, Has<LinearVelocity>, Has<Collider>)>,
) -> Result {
    let entity = add.event_target();
    let (has_body, has_velocity, has_collider) = query.get(entity)?;

    if !has_body || !has_velocity {
        return Err(SetupError::MissingMover(entity).into());
    }
    if !has_collider {
        return Err(SetupError::MissingCollider(entity).into());
    }

    debug!("locomotion controller ready on {entity}");
    Ok(())
}
