use bevy::prelude::*;

use super::state::{CharacterPose, HangAnchor, PlayerConfig};
use crate::physics::{CastHit, CollisionQuery};

/// Contact found by the forward ledge probe. Only valid for the tick that produced it.
pub type LedgeHit = CastHit;

/// Finds grabbable edges in front of the character and validates shimmying along them.
///
/// The grab probe is a capsule held horizontally across the chest, swept forward:
///
/// ```text
///        left ●━━━━━━━● right      (ledge_grab_y_offset above the body centre,
///                 │                 ledge_probe_forward in front of it)
///                 ▼ forward, up to ledge_grab_distance
/// ```
pub struct LedgeDetector<'a> {
    config: &'a PlayerConfig,
}

impl<'a> LedgeDetector<'a> {
    pub fn new(config: &'a PlayerConfig) -> Self {
        Self { config }
    }

    /// Centre of the probe, before any lateral offset
    fn probe_origin(&self, pose: &CharacterPose) -> Vec3 {
        pose.position
            + Vec3::Y * self.config.ledge_grab_y_offset
            + pose.forward * self.config.ledge_probe_forward
    }

    /// Sweeps the grab probe forward and returns the first ledge contact.
    ///
    /// Callers only probe while airborne and falling.
    pub fn detect(&self, world: &impl CollisionQuery, pose: &CharacterPose) -> Option<LedgeHit> {
        let direction = Dir3::new(pose.forward).ok()?;
        let origin = self.probe_origin(pose);
        let span = pose.right() * self.config.ledge_probe_half_span;

        world.cast_capsule(
            origin - span,
            origin + span,
            self.config.ledge_grab_width,
            direction,
            self.config.ledge_grab_distance,
            self.config.ledge_layers,
        )
    }

    /// Hang pose for a ledge contact: pulled back and down from the contact point,
    /// facing into the wall.
    pub fn anchor(&self, hit: &LedgeHit, pose: &CharacterPose) -> HangAnchor {
        let position = hit.point
            - pose.forward * self.config.ledge_hang_inset
            - Vec3::Y * self.config.ledge_hang_drop;
        let forward = Vec3::new(-hit.normal.x, 0.0, -hit.normal.z).normalize_or(pose.forward);

        HangAnchor { position, forward }
    }

    /// Whether the ledge continues on the side `input_x` points to.
    ///
    /// A sphere at the height of the hang contact, offset towards the requested
    /// side, is swept forward; no contact means the ledge ends there.
    pub fn can_shimmy(&self, world: &impl CollisionQuery, pose: &CharacterPose, input_x: f32) -> bool {
        if input_x == 0.0 {
            return false;
        }
        let Ok(direction) = Dir3::new(pose.forward) else {
            return false;
        };

        let center = pose.position
            + Vec3::Y * self.config.ledge_hang_drop
            + pose.right() * self.config.ledge_probe_half_span * input_x.signum();

        world
            .cast_sphere(
                center,
                self.config.ledge_grab_width,
                direction,
                self.config.ledge_hang_inset + self.config.ledge_grab_distance,
                self.config.ledge_layers,
            )
            .is_some()
    }

    /// Lateral displacement for one tick of hanging, or zero when the ledge ends.
    pub fn shimmy(
        &self,
        world: &impl CollisionQuery,
        pose: &CharacterPose,
        input_x: f32,
        dt: f32,
    ) -> Vec3 {
        if !self.can_shimmy(world, pose, input_x) {
            return Vec3::ZERO;
        }
        pose.right() * input_x * self.config.ledge_shimmy_speed * dt
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use avian3d::prelude::LayerMask;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Probe {
        Capsule { a: Vec3, b: Vec3, radius: f32, distance: f32 },
        Sphere { center: Vec3, radius: f32, distance: f32 },
    }

    /// Returns fixed results and records every probe it receives
    #[derive(Default)]
    struct ScriptedWorld {
        capsule_hit: Option<CastHit>,
        sphere_hit: Option<CastHit>,
        probes: RefCell<Vec<Probe>>,
    }

    impl CollisionQuery for ScriptedWorld {
        fn check_sphere(&self, _center: Vec3, _radius: f32, _mask: LayerMask) -> bool {
            false
        }

        fn cast_capsule(
            &self,
            a: Vec3,
            b: Vec3,
            radius: f32,
            _direction: Dir3,
            max_distance: f32,
            _mask: LayerMask,
        ) -> Option<CastHit> {
            self.probes.borrow_mut().push(Probe::Capsule {
                a,
                b,
                radius,
                distance: max_distance,
            });
            self.capsule_hit
        }

        fn cast_sphere(
            &self,
            center: Vec3,
            radius: f32,
            _direction: Dir3,
            max_distance: f32,
            _mask: LayerMask,
        ) -> Option<CastHit> {
            self.probes.borrow_mut().push(Probe::Sphere {
                center,
                radius,
                distance: max_distance,
            });
            self.sphere_hit
        }
    }

    fn wall_hit() -> CastHit {
        CastHit {
            point: Vec3::new(0.0, 2.0, -1.0),
            normal: Vec3::Z,
            distance: 0.1,
        }
    }

    #[test]
    fn grab_probe_spans_the_chest() {
        let config = PlayerConfig::default();
        let world = ScriptedWorld::default();
        let pose = CharacterPose::from_yaw(Vec3::new(0.0, 1.0, 0.0), 0.0);

        assert!(LedgeDetector::new(&config).detect(&world, &pose).is_none());

        let probes = world.probes.borrow();
        let Probe::Capsule { a, b, radius, distance } = probes[0] else {
            panic!("expected a capsule probe, got {:?}", probes[0]);
        };
        assert!(a.abs_diff_eq(Vec3::new(-0.3, 1.6, -0.1), 1e-5));
        assert!(b.abs_diff_eq(Vec3::new(0.3, 1.6, -0.1), 1e-5));
        assert_eq!(radius, config.ledge_grab_width);
        assert_eq!(distance, config.ledge_grab_distance);
    }

    #[test]
    fn anchor_pulls_back_and_faces_the_wall() {
        let config = PlayerConfig::default();
        let detector = LedgeDetector::new(&config);
        let pose = CharacterPose::from_yaw(Vec3::new(0.0, 1.0, 0.0), 0.0);
        let hit = CastHit {
            // Wall slightly angled towards +X
            normal: Vec3::new(0.6, 0.3, 0.74).normalize(),
            ..wall_hit()
        };

        let anchor = detector.anchor(&hit, &pose);

        let expected = hit.point - pose.forward * 0.1 - Vec3::Y * 0.1;
        assert!(anchor.position.abs_diff_eq(expected, 1e-5));
        assert_eq!(anchor.forward.y, 0.0);
        assert!((anchor.forward.length() - 1.0).abs() < 1e-5);
        assert!(anchor.forward.dot(Vec3::new(-0.6, 0.0, -0.74).normalize()) > 0.9999);
    }

    #[test]
    fn anchor_keeps_facing_for_vertical_normals() {
        let config = PlayerConfig::default();
        let pose = CharacterPose::from_yaw(Vec3::ZERO, 1.0);
        let hit = CastHit {
            normal: Vec3::Y,
            ..wall_hit()
        };
        let anchor = LedgeDetector::new(&config).anchor(&hit, &pose);
        assert!(anchor.forward.abs_diff_eq(pose.forward, 1e-6));
    }

    #[test]
    fn shimmy_probe_leans_towards_input() {
        let config = PlayerConfig::default();
        let world = ScriptedWorld {
            sphere_hit: Some(wall_hit()),
            ..default()
        };
        let pose = CharacterPose::from_yaw(Vec3::new(0.0, 1.0, 0.0), 0.0);
        let detector = LedgeDetector::new(&config);

        assert!(detector.can_shimmy(&world, &pose, -0.5));

        let probes = world.probes.borrow();
        let Probe::Sphere { center, radius, distance } = probes[0] else {
            panic!("expected a sphere probe, got {:?}", probes[0]);
        };
        assert!(center.abs_diff_eq(Vec3::new(-0.3, 1.1, 0.0), 1e-5));
        assert_eq!(radius, config.ledge_grab_width);
        assert!((distance - 0.3).abs() < 1e-6);
    }

    #[test]
    fn shimmy_moves_along_the_ledge() {
        let config = PlayerConfig::default();
        let world = ScriptedWorld {
            sphere_hit: Some(wall_hit()),
            ..default()
        };
        let pose = CharacterPose::from_yaw(Vec3::ZERO, 0.0);

        let step = LedgeDetector::new(&config).shimmy(&world, &pose, 1.0, 0.5);

        assert!(step.abs_diff_eq(Vec3::X * config.ledge_shimmy_speed * 0.5, 1e-5));
    }

    #[test]
    fn shimmy_is_refused_where_the_ledge_ends() {
        let config = PlayerConfig::default();
        let world = ScriptedWorld::default();
        let pose = CharacterPose::from_yaw(Vec3::ZERO, 0.0);

        let step = LedgeDetector::new(&config).shimmy(&world, &pose, 1.0, 0.5);

        assert_eq!(step, Vec3::ZERO);
    }

    #[test]
    fn no_probe_without_lateral_input() {
        let config = PlayerConfig::default();
        let world = ScriptedWorld::default();
        let pose = CharacterPose::from_yaw(Vec3::ZERO, 0.0);

        assert!(!LedgeDetector::new(&config).can_shimmy(&world, &pose, 0.0));
        assert!(world.probes.borrow().is_empty());
    }
}
