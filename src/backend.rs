//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to work
//! with the character controller. The controller only needs a handful of
//! rigid-body operations; everything else (integration, collision response)
//! stays inside the physics engine. This allows swapping engines (Rapier3D,
//! XPBD, a scripted stub for tests) without touching the locomotion logic.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The backend owns two responsibilities:
/// - rigid-body access: velocity read/write, impulses, gravity toggling;
/// - contact sensing: its [`plugin`](CharacterPhysicsBackend::plugin) must
///   install a system in [`FpsControllerSet::Sensors`](crate::FpsControllerSet)
///   that refreshes each controller's
///   [`ContactState`](crate::contact::ContactState) every physics tick.
///
/// For a reference implementation see the `rapier` module's `Rapier3dBackend`.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend, including its contact
    /// sensing system.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Apply an instantaneous velocity impulse to an entity.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Enable or disable engine gravity for an entity.
    ///
    /// The controller disables gravity while the character stands on a slope
    /// (it supplies all vertical motion there) and re-enables it otherwise.
    fn set_gravity_enabled(world: &mut World, entity: Entity, enabled: bool);

    /// Get the current world position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Get the fixed timestep delta time.
    ///
    /// Zero when the fixed clock has not advanced this tick, which makes
    /// every smoothing step a no-op.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .unwrap_or_default()
    }
}

/// Empty plugin for backends that don't need additional setup.
///
/// Useful for scripted test backends that write
/// [`ContactState`](crate::contact::ContactState) directly instead of
/// installing a sensing system.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
