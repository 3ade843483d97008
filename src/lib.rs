//! # `fps_character_controller`
//!
//! A physics-driven first-person character controller with physics backend
//! abstraction.
//!
//! This crate turns a per-tick input snapshot (move axis, look delta,
//! sprint/crouch intensity, jump) into rigid-body velocity commands and
//! camera-feel values, while classifying environment contact every physics
//! tick:
//! - walk / sprint / crouch with exponentially smoothed speed blending
//! - slope-aware steering (movement projected onto the slope plane)
//! - crouch-sliding down slopes along the last heading
//! - climbing on surfaces tagged [`Climbable`](contact::Climbable)
//! - edge-triggered jumps gated by ground contact
//! - sprint FOV zoom, movement bob amplitude, and fall-proportional landing
//!   shake for an external procedural camera
//!
//! ## Architecture
//!
//! Per fixed physics tick the pipeline runs: jump edge detection, contact
//! sensing (backend-owned), the locomotion integrator, the camera feel
//! controller, the jump resolver, then state-marker sync. Look accumulation
//! runs once per render frame, decoupled from the physics tick.
//!
//! All physics access goes through [`CharacterPhysicsBackend`], so the same
//! locomotion logic runs on Rapier3D (the `rapier3d` feature) or a scripted
//! stub in tests.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use fps_character_controller::prelude::*;
//!
//! // Components for one controller entity.
//! let config = ControllerConfig::player();
//! let input = ControlInput::default();
//! let feel = CameraFeel::new(60.0);
//!
//! // Spawn these as a bundle together with your physics components.
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod camera;
pub mod config;
pub mod contact;
pub mod input;
pub mod locomotion;
pub mod state;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use bevy::math::{Vec2, Vec3};

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::camera::{CameraFeel, LookAngles};
    pub use crate::config::ControllerConfig;
    pub use crate::contact::{Climbable, ContactState, RayHit};
    pub use crate::input::ControlInput;
    pub use crate::locomotion::{Landed, LandingEffectRequest, LocomotionState};
    pub use crate::state::{Airborne, ClimbingWall, Grounded, OnSlope};
    pub use crate::{FpsCharacterBundle, FpsControllerPlugin, FpsControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// System sets for the fixed-tick controller pipeline, run in declaration
/// order.
///
/// Backend plugins put their contact sensing system in `Sensors`; game code
/// that writes [`ControlInput`](input::ControlInput) in `FixedUpdate` should
/// run before `Input`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpsControllerSet {
    /// Jump edge detection over the raw input snapshot.
    Input,
    /// Environment contact sensing (backend-owned).
    Sensors,
    /// The locomotion integrator: velocity, crouch, sliding, fall tracking.
    Locomotion,
    /// Camera FOV/bob smoothing, landing shake.
    CameraFeel,
    /// Edge-triggered jump impulses.
    Jump,
    /// State marker component sync.
    StateSync,
}

/// Core controller components, minus the physics backend's own components.
///
/// Spawn together with the backend bundle (for Rapier3D,
/// `Rapier3dCharacterBundle`) and a collider.
#[derive(Bundle, Default)]
pub struct FpsCharacterBundle {
    /// Tuning parameters.
    pub config: config::ControllerConfig,
    /// Per-tick input snapshot, written by your input layer.
    pub input: input::ControlInput,
    /// Per-tick contact classification, written by the backend sensor.
    pub contact: contact::ContactState,
    /// Mutable locomotion state.
    pub locomotion: locomotion::LocomotionState,
    /// Accumulated view angles.
    pub look: camera::LookAngles,
    /// Camera feel output values.
    pub camera_feel: camera::CameraFeel,
}

/// Main plugin for the first-person controller.
///
/// Generic over a physics backend `B` which provides rigid-body access and
/// contact sensing.
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(FpsControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct FpsControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for FpsControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for FpsControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<input::ControlInput>();
        app.register_type::<contact::ContactState>();
        app.register_type::<contact::Climbable>();
        app.register_type::<locomotion::LocomotionState>();
        app.register_type::<camera::LookAngles>();
        app.register_type::<camera::CameraFeel>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::OnSlope>();
        app.register_type::<state::ClimbingWall>();

        app.add_event::<locomotion::Landed>();
        app.add_event::<locomotion::LandingEffectRequest>();

        app.configure_sets(
            FixedUpdate,
            (
                FpsControllerSet::Input,
                FpsControllerSet::Sensors,
                FpsControllerSet::Locomotion,
                FpsControllerSet::CameraFeel,
                FpsControllerSet::Jump,
                FpsControllerSet::StateSync,
            )
                .chain(),
        );

        // The backend plugin installs its contact sensing in Sensors.
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            (
                input::update_jump_edges.in_set(FpsControllerSet::Input),
                locomotion::apply_locomotion::<B>.in_set(FpsControllerSet::Locomotion),
                camera::update_camera_feel.in_set(FpsControllerSet::CameraFeel),
                locomotion::apply_jump::<B>.in_set(FpsControllerSet::Jump),
                state::sync_state_markers.in_set(FpsControllerSet::StateSync),
            ),
        );

        // Look accumulation is frame-rate bound, not tick bound.
        app.add_systems(Update, camera::accumulate_look);
    }
}
