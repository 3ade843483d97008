//! The locomotion integrator and jump resolver.
//!
//! This is the core of the controller: a per-tick state machine over the
//! contact classification with mode priority Climbing > OnSlope > Grounded >
//! Airborne, plus crouch as an orthogonal modifier. All velocity changes go
//! through exponential smoothing toward a mode-dependent target, so modes
//! blend without discontinuities under the fixed timestep.

use bevy::log::debug;
use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::camera::LookAngles;
use crate::config::ControllerConfig;
use crate::contact::ContactState;
use crate::input::ControlInput;

/// Emitted on the tick the character lands after an intense fall.
///
/// Consumed by the camera feel controller for the landing shake; game code can
/// read it for sounds, animation, or anything else.
#[derive(Event, Debug, Clone, Copy)]
pub struct Landed {
    /// The controller entity that landed.
    pub entity: Entity,
    /// World position at the moment of landing.
    pub position: Vec3,
    /// Change in vertical speed over the fall, used to scale feedback.
    pub fall_magnitude: f32,
}

/// Emitted alongside [`Landed`] when the fall was hard enough to warrant a
/// visual effect (dust burst, decal). The effect system decides what, if
/// anything, to spawn.
#[derive(Event, Debug, Clone, Copy)]
pub struct LandingEffectRequest {
    /// The controller entity that landed.
    pub entity: Entity,
    /// Where to place the effect.
    pub position: Vec3,
    /// Fall magnitude, for effect scaling.
    pub fall_magnitude: f32,
}

/// Mutable locomotion state, owned by the integrator.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Smoothed sprint speed contribution. Always non-negative.
    pub current_sprint_speed: f32,

    /// Last heading while moving un-crouched. When the character then stops
    /// on a slope while crouched, it keeps sliding along this direction
    /// instead of stopping dead.
    pub slide_direction: Vec3,

    /// Vertical velocity sample from the previous tick, for fall tracking.
    pub last_fall_sample_y: f32,

    /// Latched when vertical speed changed by more than the intense-fall
    /// threshold between ticks. Cleared on the next landing.
    pub intense_fall_pending: bool,

    /// Whether the crouch scale is currently applied to the transform.
    pub(crate) crouch_applied: bool,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            current_sprint_speed: 0.0,
            slide_direction: Vec3::NEG_Z,
            last_fall_sample_y: 0.0,
            intense_fall_pending: false,
            crouch_applied: false,
        }
    }
}

impl LocomotionState {
    /// Create a fresh locomotion state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the vertical velocity for fall tracking.
    ///
    /// Returns the magnitude of the change since the previous sample and
    /// latches `intense_fall_pending` when it exceeds `threshold`. The caller
    /// decides whether this tick is a landing.
    pub fn sample_fall(&mut self, vertical_velocity: f32, threshold: f32) -> f32 {
        let fall = (vertical_velocity - self.last_fall_sample_y).abs();
        if fall >= threshold {
            self.intense_fall_pending = true;
        }
        self.last_fall_sample_y = vertical_velocity;
        fall
    }
}

/// Exponentially blend `current` toward `target`.
///
/// Tick-scaled so the feel is framerate independent:
/// `current + (target - current) * (1 - exp(-rate * dt))`. A rate of zero
/// means no smoothing at all and snaps to the target.
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 {
        return target;
    }
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Vector form of [`smooth_toward`], blending each component at the same rate.
pub fn smooth_toward_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    if rate <= 0.0 {
        return target;
    }
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Remove the component of `v` along `normal`.
///
/// With a zero normal (downward probe missed) the vector passes through
/// unchanged, so flat-ground movement needs no special case.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    if normal == Vec3::ZERO {
        v
    } else {
        v - normal * v.dot(normal)
    }
}

/// The locomotion integrator. Runs once per fixed tick, after contact sensing.
///
/// Order of operations: crouch scale, sprint blending, fall/landing tracking,
/// then the velocity write for whichever mode has priority this tick, then the
/// gravity toggle.
pub fn apply_locomotion<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(
        Entity,
        ControllerConfig,
        ControlInput,
        ContactState,
        LookAngles,
        LocomotionState,
    )> = world
        .query::<(
            Entity,
            &ControllerConfig,
            &ControlInput,
            &ContactState,
            &LookAngles,
            &LocomotionState,
        )>()
        .iter(world)
        .map(|(e, config, input, contact, look, state)| {
            (e, *config, input.clone(), *contact, *look, *state)
        })
        .collect();

    for (entity, config, input, contact, look, mut state) in entities {
        let velocity = B::get_velocity(world, entity);
        let on_slope = contact.is_on_slope(&config);
        let crouching = input.is_crouching();
        let forward = look.forward();
        let right = look.right();

        // Crouch engagement scales the vertical extent; reverting requires
        // both released input and overhead clearance.
        if crouching {
            if let Some(mut transform) = world.get_mut::<Transform>(entity) {
                transform.scale.y = 1.0 / config.crouch_scale_divisor;
            }
            state.crouch_applied = true;
        } else if state.crouch_applied && contact.overhead_clear {
            if let Some(mut transform) = world.get_mut::<Transform>(entity) {
                transform.scale.y = 1.0;
            }
            state.crouch_applied = false;
        }

        // Sprint contribution ramps while running on walkable ground and
        // bleeds off at unit rate everywhere else (airborne, climbing).
        let run_branch = !contact.climbable && (contact.grounded || on_slope);
        if run_branch {
            let drive =
                input.sprint * input.move_strength_sq() * if crouching { 0.0 } else { 1.0 };
            state.current_sprint_speed = smooth_toward(
                state.current_sprint_speed,
                config.sprint_speed * drive,
                config.start_friction,
                dt,
            );
        } else {
            state.current_sprint_speed =
                smooth_toward(state.current_sprint_speed, 0.0, 1.0, dt);
        }

        // Fall tracking: latch on a hard vertical speed change, release as a
        // landing event on the next grounded tick.
        let fall = state.sample_fall(velocity.y, config.intense_fall_threshold);
        if contact.grounded && state.intense_fall_pending {
            state.intense_fall_pending = false;
            let position = B::get_position(world, entity);
            debug!("landed after intense fall, magnitude {fall:.2}");
            world.send_event(Landed {
                entity,
                position,
                fall_magnitude: fall,
            });
            if fall >= config.effect_fall_threshold {
                world.send_event(LandingEffectRequest {
                    entity,
                    position,
                    fall_magnitude: fall,
                });
            }
        }

        // Velocity write for the winning mode.
        let new_velocity = if input.is_moving() {
            if !crouching {
                state.slide_direction = forward;
            }

            if contact.climbable {
                // Climbing drives the vertical axis directly, superseding
                // gravity. Horizontal velocity is left from the prior tick.
                let climb_y = input.move_axis.y * config.climbing_speed
                    - input.crouch * config.climbing_speed / config.crouch_scale_divisor;
                Vec3::new(velocity.x, climb_y, velocity.z)
            } else {
                // Walk/sprint/crouch-walk: steer along the slope plane so the
                // character neither climbs nor sinks through inclined ground.
                let wish = (right * input.move_axis.x + forward * input.move_axis.y)
                    .normalize_or_zero();
                let steer = project_on_plane(wish, contact.slope_normal).normalize_or_zero();
                let speed = config.movement_speed + state.current_sprint_speed
                    - config.crouch_speed_penalty * input.crouch;
                let target = Vec3::new(steer.x * speed, velocity.y, steer.z * speed);
                smooth_toward_vec3(velocity, target, config.start_friction, dt)
            }
        } else {
            // Idle: bleed horizontal speed toward rest, except crouched on a
            // slope where the character keeps sliding along its last heading.
            let horizontal_target = if on_slope && crouching {
                (velocity + state.slide_direction).normalize_or_zero() * config.slide_speed
            } else {
                Vec3::ZERO
            };
            let target = Vec3::new(horizontal_target.x, velocity.y, horizontal_target.z);
            let rate = config.end_friction - input.crouch * config.end_friction / 2.0;
            smooth_toward_vec3(velocity, target, rate, dt)
        };
        B::set_velocity(world, entity, new_velocity);

        // On a slope the controller supplies all vertical motion.
        B::set_gravity_enabled(world, entity, !on_slope);

        if let Some(mut stored) = world.get_mut::<LocomotionState>(entity) {
            *stored = state;
        }
    }
}

/// The jump resolver. Runs once per fixed tick, after the camera feel update.
///
/// On a jump edge, if the character is on walkable ground (grounded or on a
/// slope) and not climbing, applies a single impulse: the horizontal part
/// carries the current movement intent at full speed, the vertical part is the
/// jump force reduced by crouch depth. Airborne and climbing edges are
/// swallowed, so there is no double-jump and no climb-jump.
pub fn apply_jump<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig, ControlInput, ContactState, LookAngles, f32)> =
        world
            .query::<(
                Entity,
                &ControllerConfig,
                &ControlInput,
                &ContactState,
                &LookAngles,
                &LocomotionState,
            )>()
            .iter(world)
            .map(|(e, config, input, contact, look, state)| {
                (
                    e,
                    *config,
                    input.clone(),
                    *contact,
                    *look,
                    state.current_sprint_speed,
                )
            })
            .collect();

    for (entity, config, input, contact, look, sprint_speed) in entities {
        if !input.jump_edge() {
            continue;
        }
        if contact.climbable || !(contact.grounded || contact.is_on_slope(&config)) {
            continue;
        }

        let speed = config.movement_speed + sprint_speed;
        let horizontal =
            (look.right() * input.move_axis.x + look.forward() * input.move_axis.y) * speed;
        let vertical = Vec3::Y
            * (config.jump_force - input.crouch * config.jump_force / config.crouch_scale_divisor);
        B::apply_impulse(world, entity, horizontal + vertical);
    }
}
