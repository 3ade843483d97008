//! Controller configuration components.
//!
//! This module defines the tuning parameters for the first-person controller:
//! movement and sprint speeds, crouch behavior, friction rates, slope limits,
//! contact probe dimensions, and camera-feel coefficients.

use bevy::prelude::*;

/// Configuration parameters for the first-person character controller.
///
/// All values are supplied at construction and treated as immutable while the
/// controller runs. The defaults are tuned for a human-scale character in a
/// world where one unit is one meter.
///
/// The controller assumes validated parameters: in particular
/// `crouch_scale_divisor` must be positive (it divides crouch height, crouch
/// jump force, and crouch climb speed).
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Movement Settings ===
    /// Base horizontal movement speed (units/second).
    pub movement_speed: f32,

    /// Additional speed on top of `movement_speed` at full sprint.
    /// The effective sprint contribution is smoothed per tick, so speed
    /// ramps up rather than stepping.
    pub sprint_speed: f32,

    /// Horizontal speed while sliding down a slope (crouched, no input).
    pub slide_speed: f32,

    /// Speed subtracted per unit of crouch intensity while moving crouched.
    pub crouch_speed_penalty: f32,

    /// Divisor applied to the character's vertical scale while crouching.
    /// A value of 3.0 shrinks the character to a third of its height.
    /// Must be positive.
    pub crouch_scale_divisor: f32,

    /// Vertical speed while climbing a climbable wall (units/second).
    pub climbing_speed: f32,

    // === Friction Settings ===
    /// Smoothing rate toward the target velocity while input is held.
    /// Higher values reach the target faster.
    pub start_friction: f32,

    /// Smoothing rate toward rest (or the slide target) while input is idle.
    pub end_friction: f32,

    // === Jump Settings ===
    /// Vertical impulse applied on a jump. Reduced proportionally while
    /// crouching.
    pub jump_force: f32,

    // === Contact Probe Settings ===
    /// Maximum walkable slope angle in degrees. At or beyond this angle the
    /// surface no longer counts as a slope.
    pub max_slope_angle: f32,

    /// Radius of the sphere probe used for the grounded test.
    pub ground_check_radius: f32,

    /// Distance from the character origin down to the foot anchor where the
    /// ground sphere probe is centered.
    pub ground_check_offset: f32,

    /// Vertical speed magnitude above which the character is never considered
    /// grounded. Prevents classifying a character as grounded mid-bounce.
    /// A tuning heuristic, not a structural constant.
    pub landing_speed_threshold: f32,

    /// Extra length of the downward slope-classification ray past the foot
    /// sphere's reach. The ray starts at the foot anchor and extends
    /// `ground_check_radius + slope_probe_distance`, so every surface the
    /// grounded probe can touch also gets a slope classification.
    pub slope_probe_distance: f32,

    /// Length of the forward ray used to detect climbable walls.
    pub wall_climb_radius: f32,

    /// Length of the upward ray that must be clear before un-crouching.
    pub overhead_clearance: f32,

    // === Fall Settings ===
    /// Per-tick change in vertical speed that latches an intense fall.
    /// A landing after an intense fall emits a [`Landed`](crate::locomotion::Landed) event.
    pub intense_fall_threshold: f32,

    /// Fall magnitude at which a landing additionally emits a
    /// [`LandingEffectRequest`](crate::locomotion::LandingEffectRequest).
    pub effect_fall_threshold: f32,

    // === Camera Feel Settings ===
    /// Field-of-view offset (degrees) added at full sprint.
    pub camera_run_fov: f32,

    /// Base procedural bob amplitude while moving.
    pub camera_bob_speed: f32,

    /// Smoothing rate for FOV and bob amplitude changes.
    pub camera_bob_damping: f32,

    /// Scale of the camera shake applied on landing after an intense fall.
    /// Also the upper bound of the shake amplitude.
    pub camera_land_shake_intensity: f32,

    /// Mouse look sensitivity multiplier.
    pub mouse_sensitivity: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Movement settings
            movement_speed: 4.0,
            sprint_speed: 2.0,
            slide_speed: 20.0,
            crouch_speed_penalty: 2.0,
            crouch_scale_divisor: 3.0,
            climbing_speed: 7.0,

            // Friction settings
            start_friction: 40.0,
            end_friction: 10.0,

            // Jump settings
            jump_force: 50.0,

            // Contact probe settings
            max_slope_angle: 50.0,
            ground_check_radius: 0.5,
            ground_check_offset: 1.0,
            landing_speed_threshold: 3.0,
            slope_probe_distance: 0.2,
            wall_climb_radius: 0.6,
            overhead_clearance: 2.2,

            // Fall settings
            intense_fall_threshold: 6.0,
            effect_fall_threshold: 10.0,

            // Camera feel settings
            camera_run_fov: 20.0,
            camera_bob_speed: 1.0,
            camera_bob_damping: 6.0,
            camera_land_shake_intensity: 0.2,
            mouse_sensitivity: 0.5,
        }
    }
}

impl ControllerConfig {
    /// Create a config with the default player tuning.
    pub fn player() -> Self {
        Self::default()
    }

    /// Builder: set base and sprint movement speeds.
    pub fn with_movement(mut self, movement_speed: f32, sprint_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self.sprint_speed = sprint_speed;
        self
    }

    /// Builder: set start and end friction rates.
    pub fn with_friction(mut self, start: f32, end: f32) -> Self {
        self.start_friction = start;
        self.end_friction = end;
        self
    }

    /// Builder: set crouch scale divisor and speed penalty.
    pub fn with_crouch(mut self, scale_divisor: f32, speed_penalty: f32) -> Self {
        self.crouch_scale_divisor = scale_divisor;
        self.crouch_speed_penalty = speed_penalty;
        self
    }

    /// Builder: set the maximum walkable slope angle (degrees).
    pub fn with_max_slope_angle(mut self, degrees: f32) -> Self {
        self.max_slope_angle = degrees;
        self
    }

    /// Builder: set the jump impulse strength.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set the climbing speed.
    pub fn with_climbing_speed(mut self, speed: f32) -> Self {
        self.climbing_speed = speed;
        self
    }

    /// Builder: set the slide speed.
    pub fn with_slide_speed(mut self, speed: f32) -> Self {
        self.slide_speed = speed;
        self
    }

    /// Builder: set the grounded-test vertical speed threshold.
    pub fn with_landing_speed_threshold(mut self, threshold: f32) -> Self {
        self.landing_speed_threshold = threshold;
        self
    }

    /// Builder: set the intense-fall and effect-request fall thresholds.
    pub fn with_fall_thresholds(mut self, intense: f32, effect: f32) -> Self {
        self.intense_fall_threshold = intense;
        self.effect_fall_threshold = effect;
        self
    }

    /// Builder: set the camera-feel coefficients.
    pub fn with_camera_feel(
        mut self,
        run_fov: f32,
        bob_speed: f32,
        bob_damping: f32,
        land_shake_intensity: f32,
    ) -> Self {
        self.camera_run_fov = run_fov;
        self.camera_bob_speed = bob_speed;
        self.camera_bob_damping = bob_damping;
        self.camera_land_shake_intensity = land_shake_intensity;
        self
    }

    /// Builder: set the mouse sensitivity.
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }
}
