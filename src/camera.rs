//! Camera feel and look accumulation.
//!
//! Two independent pieces live here. [`LookAngles`] accumulates yaw/pitch from
//! look input once per render frame; the render-pose step reads the result.
//! [`CameraFeel`] derives field-of-view offset and procedural shake amplitude
//! from the locomotion state once per physics tick, with its own smoothing
//! rates so camera feel can lag behind movement.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::contact::ContactState;
use crate::input::ControlInput;
use crate::locomotion::{smooth_toward, Landed, LocomotionState};

/// Internal multiplier that maps the configured sensitivity onto degrees per
/// second of look delta.
const SENSITIVITY_SCALE: f32 = 50.0;

/// Accumulated view angles in degrees.
///
/// Yaw drives both the camera and the body heading; pitch drives only the
/// camera and is always clamped to straight up/down.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LookAngles {
    /// Heading around the world Y axis, degrees. Unbounded.
    pub yaw: f32,
    /// Elevation, degrees, clamped to [-90, 90].
    pub pitch: f32,
}

impl LookAngles {
    /// Create look angles facing world forward.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a look delta, clamping pitch.
    pub fn apply_look(&mut self, delta: Vec2, sensitivity: f32, dt: f32) {
        let rate = sensitivity * SENSITIVITY_SCALE * dt;
        self.yaw -= delta.x * rate;
        self.pitch -= delta.y * rate;
        self.pitch = self.pitch.clamp(-90.0, 90.0);
    }

    /// Full camera rotation (yaw then pitch).
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    /// Body rotation: yaw only, the rigid body never pitches.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Flat forward direction on the ground plane.
    pub fn forward(&self) -> Vec3 {
        self.body_rotation() * Vec3::NEG_Z
    }

    /// Flat right direction on the ground plane.
    pub fn right(&self) -> Vec3 {
        self.body_rotation() * Vec3::X
    }
}

/// Camera feel values derived from locomotion.
///
/// `fov()` is what the render camera should use; `bob_amplitude` feeds an
/// external procedural-noise module. Both are smoothed here, never stepped.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CameraFeel {
    /// Field of view at rest, degrees. Captured once at setup.
    pub base_fov: f32,
    /// Smoothed sprint FOV offset, degrees.
    pub sprint_fov_offset: f32,
    /// Smoothed procedural bob/shake amplitude. Non-negative.
    pub bob_amplitude: f32,
}

impl Default for CameraFeel {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl CameraFeel {
    /// Create a camera feel state around the given base field of view.
    pub fn new(base_fov: f32) -> Self {
        Self {
            base_fov,
            sprint_fov_offset: 0.0,
            bob_amplitude: 0.0,
        }
    }

    /// The field of view the render camera should use this frame.
    pub fn fov(&self) -> f32 {
        self.base_fov + self.sprint_fov_offset
    }
}

/// Accumulate look input once per render frame.
pub fn accumulate_look(
    time: Res<Time>,
    mut q_looks: Query<(&ControllerConfig, &ControlInput, &mut LookAngles)>,
) {
    let dt = time.delta_secs();
    for (config, input, mut look) in &mut q_looks {
        look.apply_look(input.look_delta, config.mouse_sensitivity, dt);
    }
}

/// Update FOV offset and bob amplitude once per physics tick.
///
/// Runs after the locomotion integrator so it sees this tick's sprint speed
/// and landing events.
pub fn update_camera_feel(
    time: Res<Time<Fixed>>,
    mut landings: EventReader<Landed>,
    mut q_feels: Query<(
        Entity,
        &ControllerConfig,
        &ControlInput,
        &ContactState,
        &LocomotionState,
        &mut CameraFeel,
    )>,
) {
    let dt = time.delta_secs();

    let mut landed: HashMap<Entity, f32> = HashMap::default();
    for landing in landings.read() {
        landed.insert(landing.entity, landing.fall_magnitude);
    }

    for (entity, config, input, contact, state, mut feel) in &mut q_feels {
        let move_sq = input.move_strength_sq();
        let run_branch = !contact.climbable
            && (contact.grounded || contact.is_on_slope(config));

        if run_branch {
            let drive =
                input.sprint * move_sq * if input.is_crouching() { 0.0 } else { 1.0 };
            feel.sprint_fov_offset = smooth_toward(
                feel.sprint_fov_offset,
                config.camera_run_fov * drive,
                config.camera_bob_damping,
                dt,
            );
            feel.bob_amplitude = smooth_toward(
                feel.bob_amplitude,
                (config.camera_bob_speed + state.current_sprint_speed) * move_sq,
                config.camera_bob_damping,
                dt,
            );
        } else {
            // Airborne or climbing: both decay, FOV at half rate so the zoom
            // releases gently.
            feel.sprint_fov_offset = smooth_toward(
                feel.sprint_fov_offset,
                0.0,
                config.camera_bob_damping / 2.0,
                dt,
            );
            feel.bob_amplitude =
                smooth_toward(feel.bob_amplitude, 0.0, config.camera_bob_damping, dt);
        }

        // Landing shake overrides this tick's bob: raise the amplitude to a
        // fall-proportional floor, cap it at the configured intensity, then
        // pulse it toward a short decay value. The floor can exceed the cap
        // on big falls; the cap wins, so no panicking clamp here.
        if let Some(&fall) = landed.get(&entity) {
            let floor = config.camera_land_shake_intensity * fall;
            let kicked = feel
                .bob_amplitude
                .max(floor)
                .min(config.camera_land_shake_intensity);
            feel.bob_amplitude =
                smooth_toward(kicked, 5.0 * dt, config.camera_bob_damping, dt);
        }
    }
}
