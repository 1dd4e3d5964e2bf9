//! Pointer drag of the control-point handles.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use cube_deform::{InteractionState, Ray};

use crate::camera::OrbitCamera;
use crate::scene::{ControlPoints, FrameSet};
use crate::settings::ViewerSettings;
use crate::ui::pointer_over_ui;

/// Plugin for grabbing and moving control points.
pub struct ControlPointDragPlugin;

impl Plugin for ControlPointDragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragInteraction>().add_systems(
            Update,
            (start_drag, drag_point, end_drag)
                .chain()
                .in_set(DragSystems)
                .in_set(FrameSet::Input),
        );
    }
}

/// Drag systems; the orbit controller runs after them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragSystems;

/// Grab state and the orbit enable flag.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct DragInteraction(pub InteractionState);

/// Cursor ray from the orbit camera, if the cursor is inside the window.
fn cursor_ray(window: &Window, camera: &Camera, transform: &GlobalTransform) -> Option<Ray> {
    let cursor = window.cursor_position()?;
    let ray = camera.viewport_to_world(transform, cursor).ok()?;
    Ray::new(ray.origin, *ray.direction)
}

/// Grab the handle under the cursor on left press.
#[allow(clippy::needless_pass_by_value)]
fn start_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<ViewerSettings>,
    points: Res<ControlPoints>,
    mut interaction: ResMut<DragInteraction>,
    mut contexts: EguiContexts,
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<OrbitCamera>>,
) {
    if !mouse.just_pressed(MouseButton::Left) || pointer_over_ui(&mut contexts) {
        return;
    }
    let (camera, transform) = *camera;
    let Some(ray) = cursor_ray(&window, camera, transform) else {
        tracing::warn!("Press ignored: cursor ray unavailable");
        return;
    };

    let half_extent = settings.handle_size / 2.0;
    if let Some(index) = interaction.drag_start(&ray, *transform.forward(), &points, half_extent)
    {
        tracing::info!("Grabbed control point {index}, orbit disabled");
    }
}

/// Move the grabbed point with the cursor.
#[allow(clippy::needless_pass_by_value)]
fn drag_point(
    mut points: ResMut<ControlPoints>,
    mut interaction: ResMut<DragInteraction>,
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<OrbitCamera>>,
) {
    if interaction.grabbed().is_none() {
        return;
    }
    let (camera, transform) = *camera;
    let Some(ray) = cursor_ray(&window, camera, transform) else {
        return;
    };
    if let Some(position) = interaction.drag_to(&ray, &mut points) {
        tracing::debug!("Control point moved to {position}");
    }
}

/// Release the grab on left release.
#[allow(clippy::needless_pass_by_value)]
fn end_drag(mouse: Res<ButtonInput<MouseButton>>, mut interaction: ResMut<DragInteraction>) {
    if !mouse.just_released(MouseButton::Left) {
        return;
    }
    if let Some(index) = interaction.drag_end() {
        tracing::info!("Released control point {index}, orbit enabled");
    }
}
