use avian3d::prelude::*;
use bevy::prelude::*;

/// Contact reported by a swept cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// World-space contact point
    pub point: Vec3,
    /// Surface normal at the contact point
    pub normal: Vec3,
    /// Distance travelled along the cast direction before contact
    pub distance: f32,
}

/// The three collision queries the locomotion core needs from the world.
///
/// Implemented for Avian's [`SpatialQuery`]; tests provide scripted worlds.
/// Implementations must be read-only so several characters can query the
/// same world during one tick.
pub trait CollisionQuery {
    /// Returns true if a sphere at `center` overlaps anything in `mask`.
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Sweeps a capsule with segment `a`..`b` along `direction`.
    fn cast_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit>;

    /// Sweeps a sphere along `direction`.
    fn cast_sphere(
        &self,
        center: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit>;
}

impl CollisionQuery for SpatialQuery<'_, '_> {
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        let filter = SpatialQueryFilter::default().with_mask(mask);
        !self
            .shape_intersections(&Collider::sphere(radius), center, Quat::IDENTITY, &filter)
            .is_empty()
    }

    fn cast_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit> {
        // Build the capsule around its midpoint so the cast origin is well defined
        let origin = (a + b) * 0.5;
        let shape = Collider::capsule_endpoints(radius, a - origin, b - origin);
        sweep(self, &shape, origin, direction, max_distance, mask)
    }

    fn cast_sphere(
        &self,
        center: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit> {
        sweep(self, &Collider::sphere(radius), center, direction, max_distance, mask)
    }
}

fn sweep(
    spatial_query: &SpatialQuery,
    shape: &Collider,
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    mask: LayerMask,
) -> Option<CastHit> {
    let filter = SpatialQueryFilter::default().with_mask(mask);
    let config = ShapeCastConfig {
        max_distance,
        ..default()
    };

    spatial_query
        .cast_shape(shape, origin, Quat::IDENTITY, direction, &config, &filter)
        .map(|hit| CastHit {
            point: hit.point1,
            normal: hit.normal1,
            distance: hit.distance,
        })
}
