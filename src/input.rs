//! Per-tick input snapshot.
//!
//! The controller does not read devices. Your input layer (keyboard, gamepad,
//! AI, replay) writes a [`ControlInput`] once per frame and the controller
//! systems consume it. Jump presses are edge-detected internally so a held
//! button fires exactly once.

use bevy::prelude::*;

/// Input snapshot consumed by the controller each physics tick.
///
/// All setters clamp into their valid ranges. The snapshot is read-only to
/// the controller core except for the jump edge bookkeeping.
///
/// # Example
///
/// ```rust
/// use fps_character_controller::prelude::*;
///
/// let mut input = ControlInput::default();
/// input.set_move_axis(Vec2::new(0.0, 1.0));
/// input.set_sprint(1.0);
/// assert!(input.is_moving());
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ControlInput {
    /// Movement axis: x = strafe (-1 left, 1 right), y = forward/back
    /// (-1 back, 1 forward). Each component clamped to [-1, 1].
    pub move_axis: Vec2,

    /// Look delta for this frame (mouse/stick), in device units.
    pub look_delta: Vec2,

    /// Sprint intensity in [0, 1]. Analog triggers give values between.
    pub sprint: f32,

    /// Crouch intensity in [0, 1]. Any non-zero value engages the crouch.
    pub crouch: f32,

    /// Whether the jump action is currently held. Set this every frame from
    /// your input source; the controller detects the rising edge.
    pub jump_pressed: bool,

    /// Previous tick's `jump_pressed`, for edge detection.
    pub(crate) jump_pressed_prev: bool,

    /// True for exactly one physics tick per press. Derived by
    /// [`update_jump_edges`], consumed by the jump resolver.
    pub(crate) jump_edge: bool,
}

impl Default for ControlInput {
    fn default() -> Self {
        Self {
            move_axis: Vec2::ZERO,
            look_delta: Vec2::ZERO,
            sprint: 0.0,
            crouch: 0.0,
            jump_pressed: false,
            jump_pressed_prev: false,
            jump_edge: false,
        }
    }
}

impl ControlInput {
    /// Create a new empty input snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement axis, clamping each component to [-1, 1].
    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Set the look delta for this frame.
    pub fn set_look_delta(&mut self, delta: Vec2) {
        self.look_delta = delta;
    }

    /// Set the sprint intensity, clamped to [0, 1].
    pub fn set_sprint(&mut self, intensity: f32) {
        self.sprint = intensity.clamp(0.0, 1.0);
    }

    /// Set the crouch intensity, clamped to [0, 1].
    pub fn set_crouch(&mut self, intensity: f32) {
        self.crouch = intensity.clamp(0.0, 1.0);
    }

    /// Set the jump held state. The controller turns the rising edge into a
    /// single-tick jump trigger.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Check if there is active movement input.
    pub fn is_moving(&self) -> bool {
        self.move_axis.length_squared() > 1.0e-6
    }

    /// Check if the crouch is engaged (any non-zero intensity).
    pub fn is_crouching(&self) -> bool {
        self.crouch != 0.0
    }

    /// Squared magnitude of the movement axis, used to scale sprint and bob.
    pub fn move_strength_sq(&self) -> f32 {
        self.move_axis.length_squared()
    }

    /// Whether a jump was triggered this tick.
    pub fn jump_edge(&self) -> bool {
        self.jump_edge
    }
}

/// Derive the single-tick jump edge from the held jump state.
///
/// Runs first in the fixed-tick pipeline so every later system sees a
/// consistent edge flag for this tick.
pub fn update_jump_edges(mut q_inputs: Query<&mut ControlInput>) {
    for mut input in &mut q_inputs {
        input.jump_edge = input.jump_pressed && !input.jump_pressed_prev;
        input.jump_pressed_prev = input.jump_pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_default_is_idle() {
        let input = ControlInput::new();
        assert!(!input.is_moving());
        assert!(!input.is_crouching());
        assert!(!input.jump_edge());
        assert_eq!(input.move_strength_sq(), 0.0);
    }

    #[test]
    fn input_move_axis_clamps() {
        let mut input = ControlInput::new();
        input.set_move_axis(Vec2::new(5.0, -5.0));
        assert_eq!(input.move_axis, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn input_intensities_clamp() {
        let mut input = ControlInput::new();
        input.set_sprint(2.0);
        input.set_crouch(-1.0);
        assert_eq!(input.sprint, 1.0);
        assert_eq!(input.crouch, 0.0);

        input.set_crouch(0.4);
        assert!(input.is_crouching());
    }

    #[test]
    fn input_is_moving_threshold() {
        let mut input = ControlInput::new();
        input.set_move_axis(Vec2::new(0.0005, 0.0));
        assert!(!input.is_moving());

        input.set_move_axis(Vec2::new(0.5, 0.0));
        assert!(input.is_moving());
    }

    #[test]
    fn jump_edge_fires_once_per_press() {
        let mut input = ControlInput::new();

        // Simulate what update_jump_edges does per tick.
        let mut tick = |input: &mut ControlInput| {
            input.jump_edge = input.jump_pressed && !input.jump_pressed_prev;
            input.jump_pressed_prev = input.jump_pressed;
        };

        input.set_jump_pressed(true);
        tick(&mut input);
        assert!(input.jump_edge());

        // Held: no second edge.
        tick(&mut input);
        assert!(!input.jump_edge());

        // Release and press again: new edge.
        input.set_jump_pressed(false);
        tick(&mut input);
        assert!(!input.jump_edge());

        input.set_jump_pressed(true);
        tick(&mut input);
        assert!(input.jump_edge());
    }
}
