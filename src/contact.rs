//! Environment contact classification.
//!
//! These structures hold the results of the per-tick physics probes: ground
//! overlap, slope normal, climbable-wall contact, and overhead clearance.
//! The backend's sensing system recomputes a [`ContactState`] every physics
//! tick; a missed probe is a normal result, never an error.

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Marker for surfaces the character can climb.
///
/// Attach to any collider entity to make it climbable. The forward contact
/// probe checks the hit entity for this marker.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Climbable;

/// Result of a single ray probe against the physics world.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayHit {
    /// Distance to the hit point.
    pub distance: f32,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Whether the hit surface is tagged [`Climbable`].
    pub climbable: bool,
    /// Entity that was hit (if known).
    pub entity: Option<Entity>,
}

impl RayHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            climbable: false,
            entity,
        }
    }

    /// Mark the hit surface as climbable.
    pub fn climbable(mut self) -> Self {
        self.climbable = true;
        self
    }
}

/// Environment contact classification for one physics tick.
///
/// Recomputed from scratch by the backend sensing system at the start of each
/// tick; nothing here persists across ticks. The locomotion integrator, camera
/// feel controller, and jump resolver all read this instead of querying the
/// physics world themselves, which keeps classification deterministic and
/// independent of collision event ordering.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ContactState {
    /// Whether the foot probe overlaps ground and vertical speed is below the
    /// landing threshold.
    pub grounded: bool,

    /// Whether the short downward ray hit anything. Slope fields are only
    /// meaningful when this is true.
    pub ground_probe_hit: bool,

    /// Normal of the surface under the character. `Vec3::ZERO` when the
    /// downward probe missed.
    pub slope_normal: Vec3,

    /// Angle between `slope_normal` and world up, in degrees. Zero on flat
    /// ground or when the probe missed.
    pub slope_angle: f32,

    /// Whether the forward probe hit a surface tagged [`Climbable`].
    pub climbable: bool,

    /// Normal of the climbable wall. Only meaningful when `climbable` is true.
    pub wall_normal: Vec3,

    /// Whether the upward probe found no obstruction. Gates un-crouching so
    /// the character never stands up into a low ceiling.
    pub overhead_clear: bool,
}

impl Default for ContactState {
    fn default() -> Self {
        Self {
            grounded: false,
            ground_probe_hit: false,
            slope_normal: Vec3::ZERO,
            slope_angle: 0.0,
            climbable: false,
            wall_normal: Vec3::ZERO,
            overhead_clear: true,
        }
    }
}

impl ContactState {
    /// Create a fresh, contact-free state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to no contact. Called by the sensing system before probing.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if the character stands on a slope that needs slope handling.
    ///
    /// True only for angles strictly between zero and `max_slope_angle`:
    /// flat ground is ordinary ground, and at or past the limit the surface
    /// is too steep to walk.
    pub fn is_on_slope(&self, config: &ControllerConfig) -> bool {
        self.ground_probe_hit && self.slope_angle > 0.0 && self.slope_angle < config.max_slope_angle
    }

    /// Record the downward probe result and derive the slope angle.
    pub fn set_ground_probe(&mut self, normal: Vec3) {
        self.ground_probe_hit = true;
        self.slope_normal = normal;
        self.slope_angle = normal.angle_between(Vec3::Y).to_degrees();
    }

    /// Record a climbable wall contact.
    pub fn set_climbable_wall(&mut self, normal: Vec3) {
        self.climbable = true;
        self.wall_normal = normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_contact(angle_deg: f32) -> ContactState {
        let mut contact = ContactState::new();
        let rad = angle_deg.to_radians();
        contact.set_ground_probe(Vec3::new(rad.sin(), rad.cos(), 0.0));
        contact
    }

    #[test]
    fn flat_ground_is_not_a_slope() {
        let config = ControllerConfig::default();
        let contact = slope_contact(0.0);
        assert!(!contact.is_on_slope(&config));
    }

    #[test]
    fn angles_within_limit_are_slopes() {
        let config = ControllerConfig::default();
        for angle in [1.0, 10.0, 30.0, 49.0] {
            let contact = slope_contact(angle);
            assert!(
                contact.is_on_slope(&config),
                "{angle} degrees should count as a slope"
            );
        }
    }

    #[test]
    fn max_angle_is_excluded() {
        let config = ControllerConfig::default();
        let contact = slope_contact(config.max_slope_angle);
        assert!(!contact.is_on_slope(&config));

        let contact = slope_contact(config.max_slope_angle + 10.0);
        assert!(!contact.is_on_slope(&config));
    }

    #[test]
    fn missed_probe_is_never_a_slope() {
        let config = ControllerConfig::default();
        let mut contact = ContactState::new();
        contact.slope_angle = 30.0; // stale angle without a hit
        assert!(!contact.is_on_slope(&config));
    }

    #[test]
    fn set_ground_probe_derives_angle() {
        let contact = slope_contact(30.0);
        assert!((contact.slope_angle - 30.0).abs() < 0.01);
        assert!(contact.ground_probe_hit);
    }

    #[test]
    fn reset_clears_all_contact() {
        let mut contact = slope_contact(30.0);
        contact.grounded = true;
        contact.set_climbable_wall(Vec3::X);
        contact.overhead_clear = false;

        contact.reset();
        assert!(!contact.grounded);
        assert!(!contact.ground_probe_hit);
        assert!(!contact.climbable);
        assert_eq!(contact.slope_normal, Vec3::ZERO);
        assert!(contact.overhead_clear);
    }

    #[test]
    fn ray_hit_climbable_builder() {
        let hit = RayHit::new(0.5, Vec3::X, Vec3::ZERO, None).climbable();
        assert!(hit.climbable);
        assert_eq!(hit.distance, 0.5);
    }
}
