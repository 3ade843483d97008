//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D, including the
//! contact sensing system. Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::camera::LookAngles;
use crate::config::ControllerConfig;
use crate::contact::{Climbable, ContactState, RayHit};
use crate::FpsControllerSet;

/// Rapier3D physics backend for the first-person controller.
///
/// Rigid-body access goes through `Velocity`, `ExternalImpulse`, and
/// `GravityScale`. Contact sensing is a dedicated system that receives
/// `ReadRapierContext` as a system parameter and refreshes each controller's
/// [`ContactState`] every physics tick.
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    type VelocityComponent = Velocity;

    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // Fallback: apply as velocity change if no ExternalImpulse component
            vel.linvel += impulse;
        }
    }

    fn set_gravity_enabled(world: &mut World, entity: Entity, enabled: bool) {
        let scale = if enabled { 1.0 } else { 0.0 };
        if let Some(mut gravity) = world.get_mut::<GravityScale>(entity) {
            if gravity.0 != scale {
                gravity.0 = scale;
            }
        } else {
            world.entity_mut(entity).insert(GravityScale(scale));
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }
}

/// Plugin that sets up Rapier3D-specific systems for the controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_contact_sensing.in_set(FpsControllerSet::Sensors),
        );
    }
}

/// Rapier-specific contact sensing.
///
/// Runs four probes per controller, all excluding the character's own body:
/// - a sphere overlap at the foot anchor for the grounded test, combined with
///   the vertical-speed gate;
/// - a downward ray from the foot anchor for slope classification, reaching
///   slightly past the foot sphere so any ground the sphere can touch also
///   gets classified;
/// - a forward ray (along the flat heading) for climbable walls, checked
///   against the [`Climbable`] marker on the hit entity;
/// - an upward ray for overhead clearance before un-crouching.
pub fn rapier_contact_sensing(
    rapier_context: ReadRapierContext,
    q_climbables: Query<(), With<Climbable>>,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &LookAngles,
        &Velocity,
        &mut ContactState,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, look, velocity, mut contact) in &mut q_controllers {
        let position = transform.translation();
        let filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();

        contact.reset();

        // Grounded: foot sphere overlap, gated by vertical speed so a
        // fast-moving character mid-bounce is not classified as grounded.
        let foot = position - Vec3::Y * config.ground_check_offset;
        let foot_probe = Collider::ball(config.ground_check_radius);
        let mut overlapping = false;
        context.intersections_with_shape(foot, Quat::IDENTITY, &foot_probe, filter, |_| {
            overlapping = true;
            false
        });
        contact.grounded =
            overlapping && velocity.linvel.y.abs() < config.landing_speed_threshold;

        // Slope: downward ray from the foot anchor, long enough to reach any
        // surface the foot sphere overlaps.
        let slope_reach = config.ground_check_radius + config.slope_probe_distance;
        if let Some(hit) = ray_probe(
            &context,
            foot,
            Vec3::NEG_Y,
            slope_reach,
            filter,
            &q_climbables,
        ) {
            contact.set_ground_probe(hit.normal);
        }

        // Climbable wall: forward ray against the surface tag.
        if let Some(hit) = ray_probe(
            &context,
            position,
            look.forward(),
            config.wall_climb_radius,
            filter,
            &q_climbables,
        ) {
            if hit.climbable {
                contact.set_climbable_wall(hit.normal);
            }
        }

        // Overhead clearance for un-crouching.
        contact.overhead_clear = context
            .cast_ray(position, Vec3::Y, config.overhead_clearance, true, filter)
            .is_none();
    }
}

/// Cast a ray and fold the result into a [`RayHit`], tagging climbable
/// surfaces.
fn ray_probe(
    context: &RapierContext,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    filter: QueryFilter,
    climbables: &Query<(), With<Climbable>>,
) -> Option<RayHit> {
    let (entity, intersection) =
        context.cast_ray_and_get_normal(origin, direction, max_distance, true, filter)?;
    let hit = RayHit::new(
        intersection.time_of_impact,
        intersection.normal,
        intersection.point,
        Some(entity),
    );
    Some(if climbables.contains(entity) {
        hit.climbable()
    } else {
        hit
    })
}

/// Bundle for creating a character with Rapier3D physics.
///
/// Provides the rigid body, velocity tracking, impulse accumulator, rotation
/// lock, and gravity scale the controller expects. Combine with
/// [`FpsCharacterBundle`](crate::FpsCharacterBundle) and a collider:
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_character_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         FpsCharacterBundle::default(),
///         Rapier3dCharacterBundle::new(),
///         Collider::capsule_y(0.9, 0.4),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// The rigid body type. [`RigidBody::Dynamic`] for characters.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Updated by Rapier each step.
    pub velocity: Velocity,
    /// Accumulated impulses, used for jumps.
    pub external_impulse: ExternalImpulse,
    /// Rotation stays locked: the body yaws through the render pose, never
    /// through physics.
    pub locked_axes: LockedAxes,
    /// Gravity scale, toggled by the controller on slopes.
    pub gravity_scale: GravityScale,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier3dCharacterBundle {
    /// Create a character bundle with rotation locked.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            gravity_scale: GravityScale(1.0),
        }
    }

    /// Set the rigid body type for the character.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }
}
