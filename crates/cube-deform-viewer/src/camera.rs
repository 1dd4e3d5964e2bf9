//! Orbit camera controller.
//!
//! Left-drag on empty space rotates the camera around its target,
//! right-drag pans the target and the scroll wheel zooms. All of it is
//! suspended while a control point is being
//! dragged (see [`crate::drag`]). Also keeps the projection's aspect ratio in
//! step with the window.

use std::f32::consts::FRAC_PI_2;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_egui::EguiContexts;

use crate::drag::DragInteraction;
use crate::scene::FrameSet;
use crate::settings::ViewerSettings;
use crate::ui::pointer_over_ui;

/// Closest the camera may get to its target.
pub const MIN_RADIUS: f32 = 0.5;
/// Farthest the camera may get from its target.
pub const MAX_RADIUS: f32 = 200.0;

/// Keeps pitch away from the poles so `look_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Plugin for the orbit camera.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (
                    track_orbit_gesture,
                    orbit_with_mouse.run_if(orbit_enabled),
                    pan_with_mouse.run_if(orbit_enabled),
                    zoom_with_scroll.run_if(orbit_enabled),
                    apply_orbit,
                    update_aspect_ratio,
                )
                    .chain()
                    .in_set(FrameSet::Input)
                    .after(crate::drag::DragSystems),
            );
    }
}

/// Settings for orbit and zoom.
#[derive(Resource)]
pub struct CameraSettings {
    /// Radians of rotation per pixel of mouse motion.
    pub rotate_sensitivity: f32,
    /// Target travel per pixel of mouse motion, as a fraction of the radius.
    pub pan_sensitivity: f32,
    /// Radius multiplier per scroll line.
    pub zoom_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_factor: 1.1,
        }
    }
}

/// Spherical camera placement around a target.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Distance from the target.
    pub radius: f32,
    /// Rotation around the world Y axis, radians.
    pub yaw: f32,
    /// Elevation above the XZ plane, radians.
    pub pitch: f32,
    /// Whether a left-drag orbit gesture is in progress.
    pub orbiting: bool,
    /// Whether a right-drag pan gesture is in progress.
    pub panning: bool,
}

impl OrbitCamera {
    /// Orbit that places the camera at `eye` looking at `target`.
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().clamp(MIN_RADIUS, MAX_RADIUS);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            target,
            radius,
            yaw,
            pitch,
            orbiting: false,
            panning: false,
        }
    }

    /// Camera position for the current angles and radius.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.radius
    }

    /// Rotates by a mouse delta in pixels.
    pub fn rotate(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch + delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Screen-right and screen-up directions of the camera.
    pub fn screen_axes(&self) -> (Vec3, Vec3) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let right = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        let up = Vec3::new(-sin_yaw * sin_pitch, cos_pitch, -cos_yaw * sin_pitch);
        (right, up)
    }

    /// Slides the target (and the camera with it) by a mouse delta in
    /// pixels, so the scene follows the cursor.
    pub fn pan(&mut self, delta: Vec2, sensitivity: f32) {
        let (right, up) = self.screen_axes();
        let scale = self.radius * sensitivity;
        self.target += (up * delta.y - right * delta.x) * scale;
    }

    /// Zooms by `lines` scroll lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32, factor: f32) {
        self.radius = (self.radius * factor.powf(-lines)).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

/// Width over height, or `None` for a minimized window.
pub fn aspect_ratio(width: f32, height: f32) -> Option<f32> {
    (width > 0.0 && height > 0.0).then(|| width / height)
}

/// Spawn the camera at the configured eye position.
#[allow(clippy::needless_pass_by_value)]
fn spawn_camera(mut commands: Commands, settings: Res<ViewerSettings>) {
    let orbit = OrbitCamera::from_eye(settings.camera_eye, Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            ..default()
        }),
        // Flat colors should reach the screen unchanged.
        Tonemapping::None,
        Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
    tracing::info!(
        "Camera at {:?}, fov {}°",
        settings.camera_eye,
        settings.fov_degrees
    );
}

/// Orbit control is off while a control point is grabbed.
#[allow(clippy::needless_pass_by_value)]
fn orbit_enabled(interaction: Res<DragInteraction>) -> bool {
    interaction.orbit_enabled()
}

/// Start an orbit gesture on a left press over empty space and a pan
/// gesture on a right press, end each on its release.
#[allow(clippy::needless_pass_by_value)]
fn track_orbit_gesture(
    mouse: Res<ButtonInput<MouseButton>>,
    interaction: Res<DragInteraction>,
    mut contexts: EguiContexts,
    mut orbit: Single<&mut OrbitCamera>,
) {
    if mouse.just_released(MouseButton::Left) {
        orbit.orbiting = false;
    }
    if mouse.just_released(MouseButton::Right) {
        orbit.panning = false;
    }
    if !mouse.any_just_pressed([MouseButton::Left, MouseButton::Right])
        || !interaction.orbit_enabled()
        || pointer_over_ui(&mut contexts)
    {
        return;
    }
    if mouse.just_pressed(MouseButton::Left) {
        orbit.orbiting = true;
    }
    if mouse.just_pressed(MouseButton::Right) {
        orbit.panning = true;
    }
}

/// Rotate around the target with mouse motion.
#[allow(clippy::needless_pass_by_value)]
fn orbit_with_mouse(
    mut mouse_motion: MessageReader<MouseMotion>,
    settings: Res<CameraSettings>,
    mut orbit: Single<&mut OrbitCamera>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO || !orbit.orbiting {
        return;
    }

    orbit.rotate(delta, settings.rotate_sensitivity);
}

/// Move the target with mouse motion.
#[allow(clippy::needless_pass_by_value)]
fn pan_with_mouse(
    mut mouse_motion: MessageReader<MouseMotion>,
    settings: Res<CameraSettings>,
    mut orbit: Single<&mut OrbitCamera>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();

    if delta == Vec2::ZERO || !orbit.panning {
        return;
    }

    orbit.pan(delta, settings.pan_sensitivity);
}

/// Zoom with the scroll wheel.
#[allow(clippy::needless_pass_by_value)]
fn zoom_with_scroll(
    mut scroll_events: MessageReader<MouseWheel>,
    settings: Res<CameraSettings>,
    mut contexts: EguiContexts,
    mut orbit: Single<&mut OrbitCamera>,
) {
    if pointer_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }
    for event in scroll_events.read() {
        if event.y != 0.0 {
            orbit.zoom(event.y, settings.zoom_factor);
        }
    }
}

/// Place the camera transform from its orbit parameters.
fn apply_orbit(mut query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in &mut query {
        *transform = Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y);
    }
}

/// Recompute the perspective aspect ratio when the window is resized.
fn update_aspect_ratio(
    mut resized: MessageReader<WindowResized>,
    mut projection: Single<&mut Projection, With<OrbitCamera>>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };
    let Some(aspect) = aspect_ratio(event.width, event.height) else {
        return;
    };
    if let Projection::Perspective(perspective) = &mut **projection {
        perspective.aspect_ratio = aspect;
        tracing::debug!(
            "Window resized to {}x{}, aspect {aspect:.3}",
            event.width,
            event.height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_eye_round_trips() {
        let eye = Vec3::new(3.0, 3.0, 4.0);
        let orbit = OrbitCamera::from_eye(eye, Vec3::ZERO);
        assert!((orbit.radius - eye.length()).abs() < 1e-5);
        assert!(orbit.eye().abs_diff_eq(eye, 1e-4));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut orbit = OrbitCamera::from_eye(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.rotate(Vec2::new(0.0, 10_000.0), 0.01);
        assert!(orbit.pitch <= PITCH_LIMIT);
        orbit.rotate(Vec2::new(0.0, -20_000.0), 0.01);
        assert!(orbit.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_limits() {
        let mut orbit = OrbitCamera::from_eye(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.zoom(1.0, 1.1);
        assert!(orbit.radius < 5.0);
        orbit.zoom(1_000.0, 1.1);
        assert_eq!(orbit.radius, MIN_RADIUS);
        orbit.zoom(-1_000.0, 1.1);
        assert_eq!(orbit.radius, MAX_RADIUS);
    }

    #[test]
    fn test_screen_axes_are_orthonormal_to_view() {
        let orbit = OrbitCamera::from_eye(Vec3::new(3.0, 3.0, 4.0), Vec3::ZERO);
        let (right, up) = orbit.screen_axes();
        let view = (orbit.target - orbit.eye()).normalize();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
        assert!(right.dot(view).abs() < 1e-5);
        assert!(up.dot(view).abs() < 1e-5);
        // Right, up, backwards form a right-handed frame.
        assert!(right.cross(up).dot(-view) > 0.99);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut orbit = OrbitCamera::from_eye(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let offset = orbit.eye() - orbit.target;
        orbit.pan(Vec2::new(100.0, 0.0), 0.002);
        // Dragging right slides the scene right, so the target moves left.
        assert!(orbit.target.x < 0.0);
        assert!(orbit.target.y.abs() < 1e-6);
        assert!((orbit.eye() - orbit.target).abs_diff_eq(offset, 1e-5));
        assert_eq!(orbit.radius, 5.0);

        orbit.pan(Vec2::new(0.0, 100.0), 0.002);
        assert!(orbit.target.y > 0.0);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(800.0, 400.0), Some(2.0));
        assert_eq!(aspect_ratio(800.0, 0.0), None);
    }
}
