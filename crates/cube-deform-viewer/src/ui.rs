//! Inspector panel: control-point coordinates and a reset button.
//!
//! The panel runs in the egui pass, after the frame's geometry has been
//! deformed. It only records edits; [`apply_inspector_edits`] applies them
//! with the rest of the input on the next update.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use cube_deform::{CORNER_COUNT, ControlPointSet};

use crate::drag::{DragInteraction, DragSystems};
use crate::scene::{ControlPoints, FrameSet};
use crate::settings::ViewerSettings;

/// Plugin for the inspector panel.
pub struct InspectorPlugin;

impl Plugin for InspectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InspectorEdits>()
            .add_systems(
                Update,
                apply_inspector_edits
                    .in_set(FrameSet::Input)
                    .before(DragSystems),
            )
            .add_systems(EguiPrimaryContextPass, inspector_panel);
    }
}

/// A change requested from the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InspectorEdit {
    /// Move one control point.
    Move {
        /// Control point index.
        index: usize,
        /// New position.
        position: Vec3,
    },
    /// Restore the canonical corners.
    Reset,
}

/// Edits waiting for the next input phase.
#[derive(Resource, Debug, Default)]
pub struct InspectorEdits(Vec<InspectorEdit>);

impl InspectorEdits {
    /// Queue an edit.
    pub fn push(&mut self, edit: InspectorEdit) {
        self.0.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply queued edits in order and clear the queue.
    ///
    /// Returns the number of edits that took effect.
    pub fn apply(&mut self, points: &mut ControlPointSet) -> usize {
        let mut applied = 0;
        for edit in self.0.drain(..) {
            match edit {
                InspectorEdit::Move { index, position } => match points.set(index, position) {
                    Ok(()) => applied += 1,
                    Err(e) => tracing::warn!("Inspector edit dropped: {e}"),
                },
                InspectorEdit::Reset => {
                    points.reset();
                    applied += 1;
                }
            }
        }
        applied
    }
}

/// Apply the panel's edits before this frame's deformation.
fn apply_inspector_edits(mut edits: ResMut<InspectorEdits>, mut points: ResMut<ControlPoints>) {
    // Leave the control points untouched, and unchanged, when idle.
    if edits.is_empty() {
        return;
    }
    let applied = edits.apply(&mut points);
    tracing::debug!("Applied {applied} inspector edit(s)");
}

/// Whether the pointer is over an egui area; such input belongs to the UI.
pub fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area())
}

/// Draw the inspector window.
#[allow(clippy::needless_pass_by_value)]
fn inspector_panel(
    mut contexts: EguiContexts,
    mut edits: ResMut<InspectorEdits>,
    points: Res<ControlPoints>,
    settings: Res<ViewerSettings>,
    interaction: Res<DragInteraction>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Control points")
        .default_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Geometry: {}  ·  Corners: {}",
                settings.geometry, settings.corners
            ));
            ui.separator();

            egui::Grid::new("control_points")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    ui.label("#");
                    ui.label("x");
                    ui.label("y");
                    ui.label("z");
                    ui.end_row();

                    for index in 0..CORNER_COUNT {
                        let Some(mut position) = points.position(index) else {
                            continue;
                        };
                        let grabbed = interaction.grabbed() == Some(index);
                        ui.label(if grabbed {
                            format!("{index} ●")
                        } else {
                            index.to_string()
                        });

                        let mut edited = false;
                        for value in [&mut position.x, &mut position.y, &mut position.z] {
                            edited |= ui
                                .add(egui::DragValue::new(value).speed(0.01).fixed_decimals(2))
                                .changed();
                        }
                        ui.end_row();

                        if edited {
                            edits.push(InspectorEdit::Move { index, position });
                            tracing::debug!("Control point {index} edited to {position}");
                        }
                    }
                });

            ui.separator();
            ui.add_enabled_ui(!points.is_resting(), |ui| {
                if ui.button("Reset").clicked() {
                    edits.push(InspectorEdit::Reset);
                    tracing::info!("Control points reset to {} corners", settings.corners);
                }
            });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use cube_deform::CornerConvention;

    #[test]
    fn test_edits_apply_in_order() {
        let mut points = ControlPointSet::new(CornerConvention::Symmetric);
        let mut edits = InspectorEdits::default();
        edits.push(InspectorEdit::Move {
            index: 2,
            position: Vec3::splat(4.0),
        });
        edits.push(InspectorEdit::Reset);
        edits.push(InspectorEdit::Move {
            index: 1,
            position: Vec3::new(2.0, -1.0, -1.0),
        });

        assert_eq!(edits.apply(&mut points), 3);
        assert!(edits.is_empty());
        assert_eq!(points.position(2), Some(Vec3::new(-1.0, 1.0, -1.0)));
        assert_eq!(points.position(1), Some(Vec3::new(2.0, -1.0, -1.0)));
    }

    #[test]
    fn test_out_of_range_edit_is_dropped() {
        let mut points = ControlPointSet::new(CornerConvention::Unit);
        let mut edits = InspectorEdits::default();
        edits.push(InspectorEdit::Move {
            index: CORNER_COUNT,
            position: Vec3::ONE,
        });
        assert_eq!(edits.apply(&mut points), 0);
        assert!(points.is_resting());
    }

    #[test]
    fn test_pending_edits_reach_control_points() {
        let mut world = World::new();
        world.insert_resource(ControlPoints::default());
        let mut edits = InspectorEdits::default();
        edits.push(InspectorEdit::Move {
            index: 7,
            position: Vec3::new(1.5, 1.0, 1.0),
        });
        world.insert_resource(edits);

        world.run_system_once(apply_inspector_edits).unwrap();

        let points = world.resource::<ControlPoints>();
        assert_eq!(points.position(7), Some(Vec3::new(1.5, 1.0, 1.0)));
        assert!(world.resource::<InspectorEdits>().is_empty());
    }
}
